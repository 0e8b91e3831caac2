//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Event, UserRole};

// ==================== Events ====================

/// Query parameters for listing events.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Maximum number of results (default 20, at most 100).
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Response for listing events.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListEventsResponse {
    /// Events visible to the caller.
    pub events: Vec<Event>,
    /// Number of visible events across all pages.
    pub total: i64,
    /// Limit used.
    pub limit: i64,
    /// Offset used.
    pub offset: i64,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
    /// Timestamp.
    pub timestamp: String,
}

// ==================== Authentication ====================

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT token.
    pub token: String,
    /// User information.
    pub user: UserInfo,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User information.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    /// User ID.
    pub id: String,
    /// User email.
    pub email: String,
    /// User role.
    pub role: UserRole,
}
