//! JWT authentication for event service users.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{Caller, UserRole};
use crate::error::{EventError, EventResult};

/// JWT claims for authenticated users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// User email.
    pub email: String,
    /// User role.
    pub role: UserRole,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    /// The request identity these claims describe.
    pub fn caller(&self) -> Caller {
        Caller::user(self.sub.clone(), self.role)
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in hours.
    token_duration_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_duration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_duration_hours,
        }
    }

    /// Get token duration in hours.
    pub fn token_duration_hours(&self) -> i64 {
        self.token_duration_hours
    }

    /// Generate a JWT token for a user.
    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        role: UserRole,
    ) -> EventResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_duration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| EventError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a JWT token.
    pub fn validate_token(&self, token: &str) -> EventResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                EventError::Unauthorized(format!("Invalid token: {}", e))
            })?;

        Ok(token_data.claims)
    }
}

/// Configured user from config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredUser {
    /// User ID, recorded as `created_by` on events.
    pub id: String,
    /// User email.
    pub email: String,
    /// Password hash (SHA256 hex).
    pub password_hash: String,
    /// User role.
    #[serde(default)]
    pub role: UserRole,
}

impl ConfiguredUser {
    /// Verify a password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }
}

/// SHA256 hex digest of a password.
pub fn hash_password(password: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory user store backed by configuration.
#[derive(Clone)]
pub struct UserStore {
    users: std::collections::HashMap<String, ConfiguredUser>,
}

impl UserStore {
    /// Create a new user store from configured users.
    pub fn new(users: Vec<ConfiguredUser>) -> Self {
        let users = users
            .into_iter()
            .map(|u| (u.email.clone(), u))
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Find a user by email.
    pub fn find_by_email(&self, email: &str) -> Option<&ConfiguredUser> {
        self.users.get(email)
    }

    /// Authenticate a user with email and password.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&ConfiguredUser> {
        self.find_by_email(email)
            .filter(|user| user.verify_password(password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret-key-12345", "event-service".to_string(), 24);

        let token = manager
            .generate_token("user-1", "admin@example.com", UserRole::Superuser)
            .unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, UserRole::Superuser);
        assert_eq!(claims.caller(), Caller::user("user-1", UserRole::Superuser));
    }

    #[test]
    fn test_token_from_other_issuer_rejected() {
        let ours = JwtManager::new("shared-secret", "event-service".to_string(), 24);
        let theirs = JwtManager::new("shared-secret", "someone-else".to_string(), 24);

        let token = theirs
            .generate_token("user-1", "a@example.com", UserRole::Member)
            .unwrap();

        assert!(matches!(
            ours.validate_token(&token),
            Err(EventError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("secret", "event-service".to_string(), -2);
        let token = manager
            .generate_token("user-1", "a@example.com", UserRole::Member)
            .unwrap();

        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_user_authentication() {
        let users = vec![ConfiguredUser {
            id: "user-1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash_password("password123"),
            role: UserRole::Superuser,
        }];

        let store = UserStore::new(users);
        assert_eq!(store.len(), 1);

        // Valid credentials
        assert!(store.authenticate("admin@example.com", "password123").is_some());

        // Wrong password
        assert!(store.authenticate("admin@example.com", "wrong").is_none());

        // Unknown user
        assert!(store.authenticate("unknown@example.com", "password123").is_none());
    }
}
