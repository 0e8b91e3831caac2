//! HTTP request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::types::*;
use crate::auth::Claims;
use crate::domain::{Caller, Event, EventAction, EventPatch, NewEvent};
use crate::error::{EventError, EventResult};
use crate::AppState;

// ==================== Event Endpoints ====================

/// List events visible to the caller.
///
/// GET /v1/events
#[utoipa::path(
    get,
    path = "/v1/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events visible to the caller", body = ListEventsResponse),
        (status = 401, description = "Invalid token"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ListEventsQuery>,
) -> EventResult<Json<ListEventsResponse>> {
    let scope = caller.scope();
    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    let events = state.repository.list_events(&scope, limit, offset).await?;
    let total = state.repository.count_events(&scope).await?;

    Ok(Json(ListEventsResponse {
        events,
        total,
        limit,
        offset,
    }))
}

/// Get a single event.
///
/// GET /v1/events/{id}
#[utoipa::path(
    get,
    path = "/v1/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found or not visible")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> EventResult<Json<Event>> {
    let event = state.repository.get_event(&caller.scope(), id).await?;

    Ok(Json(event))
}

/// Create an event owned by the caller.
///
/// POST /v1/events
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Only superusers can verify events")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<NewEvent>,
) -> EventResult<(StatusCode, Json<Event>)> {
    let owner = caller.require_user()?;
    caller.check_verification_change(false, request.is_verified)?;

    let event = Event::new(request, owner);
    event.validate().map_err(EventError::BadRequest)?;

    state.repository.create_event(&event).await?;

    tracing::info!(
        event_id = %event.id,
        created_by = %event.created_by,
        is_verified = event.is_verified,
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

/// Replace an event's writable fields.
///
/// PUT /v1/events/{id}
#[utoipa::path(
    put,
    path = "/v1/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = NewEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Only superusers can verify events"),
        (status = 404, description = "Event not found or not visible")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<NewEvent>,
) -> EventResult<Json<Event>> {
    let mut event = state.repository.get_event(&caller.scope(), id).await?;
    caller.check_verification_change(event.is_verified, request.is_verified)?;

    event.replace(request);
    save_changes(&state, &caller, event, EventAction::Update).await
}

/// Update some of an event's fields.
///
/// PATCH /v1/events/{id}
#[utoipa::path(
    patch,
    path = "/v1/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Only superusers can verify events"),
        (status = 404, description = "Event not found or not visible")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn partial_update_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> EventResult<Json<Event>> {
    let mut event = state.repository.get_event(&caller.scope(), id).await?;
    caller.check_verification_change(event.is_verified, patch.is_verified)?;

    event.apply(patch);
    save_changes(&state, &caller, event, EventAction::PartialUpdate).await
}

async fn save_changes(
    state: &AppState,
    caller: &Caller,
    event: Event,
    action: EventAction,
) -> EventResult<Json<Event>> {
    event.validate().map_err(EventError::BadRequest)?;

    let updated = state.repository.update_event(&event).await?;

    tracing::info!(
        event_id = %updated.id,
        updated_by = caller.user_id().unwrap_or_default(),
        action = %action,
        "Event updated"
    );

    Ok(Json(updated))
}

/// Delete an event.
///
/// DELETE /v1/events/{id}
#[utoipa::path(
    delete,
    path = "/v1/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Event not found or not visible")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> EventResult<StatusCode> {
    let event = state.repository.get_event(&caller.scope(), id).await?;
    state.repository.delete_event(event.id).await?;

    tracing::info!(
        event_id = %id,
        deleted_by = caller.user_id().unwrap_or_default(),
        "Event deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match sqlx::query("SELECT 1")
        .fetch_one(state.repository.pool())
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ==================== Authentication Endpoints ====================

/// Login to obtain a JWT token.
///
/// POST /v1/auth/login
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> EventResult<Json<LoginResponse>> {
    let user = state
        .user_store
        .authenticate(&request.email, &request.password)
        .ok_or_else(|| {
            tracing::warn!(email = %request.email, "Failed login attempt");
            EventError::Unauthorized("Invalid email or password".to_string())
        })?;

    let token = state
        .jwt_manager
        .generate_token(&user.id, &user.email, user.role)?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
        },
        expires_in: state.jwt_manager.token_duration_hours() * 3600,
    }))
}

/// Get current user info from JWT token.
///
/// GET /v1/auth/me
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Current user info", body = UserInfo),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_current_user(claims: Option<Extension<Claims>>) -> EventResult<Json<UserInfo>> {
    let Extension(claims) =
        claims.ok_or_else(|| EventError::Unauthorized("Authentication required".to_string()))?;

    Ok(Json(UserInfo {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    }))
}
