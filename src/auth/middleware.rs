//! Authentication middleware for axum.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::{header::AUTHORIZATION, request::Parts, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::convert::Infallible;

use crate::auth::JwtManager;
use crate::domain::{Caller, EventAction};
use crate::error::EventError;

/// Error response for authentication failures.
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Resolve the request's caller from an optional bearer token.
///
/// No `Authorization` header means an anonymous caller. A header that is
/// present but malformed, invalid or expired is rejected outright rather
/// than downgraded to anonymous.
pub async fn authenticate(
    State(jwt_manager): State<JwtManager>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default().to_string());

    let Some(header) = header else {
        request.extensions_mut().insert(Caller::Anonymous);
        return Ok(next.run(request).await);
    };

    let token = header.strip_prefix("Bearer ").ok_or_else(|| AuthError {
        error: "Invalid authorization format. Use: Bearer <token>".to_string(),
        code: "INVALID_AUTH_HEADER".to_string(),
    })?;

    let claims = jwt_manager.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bearer token");
        AuthError {
            error: "Invalid or expired token".to_string(),
            code: "INVALID_TOKEN".to_string(),
        }
    })?;

    request.extensions_mut().insert(claims.caller());
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Apply the event permission rule before any path or body extraction.
///
/// Installed as a route layer on the event routes, inside `authenticate`,
/// so anonymous writes fail with `401` whatever their payload looks like.
pub async fn authorize_event_action(
    request: Request<Body>,
    next: Next,
) -> Result<Response, EventError> {
    let targets_item = request
        .extensions()
        .get::<MatchedPath>()
        .is_some_and(|path| path.as_str().ends_with("/:id"));

    if let Some(action) = event_action(request.method(), targets_item) {
        let caller = request
            .extensions()
            .get::<Caller>()
            .cloned()
            .unwrap_or(Caller::Anonymous);
        action.authorize(&caller)?;
    }

    Ok(next.run(request).await)
}

/// Map an HTTP method on the collection or item route to its action.
fn event_action(method: &Method, targets_item: bool) -> Option<EventAction> {
    match (method, targets_item) {
        (&Method::GET | &Method::HEAD, false) => Some(EventAction::List),
        (&Method::GET | &Method::HEAD, true) => Some(EventAction::Retrieve),
        (&Method::POST, false) => Some(EventAction::Create),
        (&Method::PUT, true) => Some(EventAction::Update),
        (&Method::PATCH, true) => Some(EventAction::PartialUpdate),
        (&Method::DELETE, true) => Some(EventAction::Destroy),
        _ => None,
    }
}

/// Handlers take the caller directly; routes outside the
/// authentication layer see an anonymous caller.
#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Caller>()
            .cloned()
            .unwrap_or(Caller::Anonymous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_action_mapping() {
        assert_eq!(event_action(&Method::GET, false), Some(EventAction::List));
        assert_eq!(event_action(&Method::GET, true), Some(EventAction::Retrieve));
        assert_eq!(event_action(&Method::POST, false), Some(EventAction::Create));
        assert_eq!(event_action(&Method::PUT, true), Some(EventAction::Update));
        assert_eq!(
            event_action(&Method::PATCH, true),
            Some(EventAction::PartialUpdate)
        );
        assert_eq!(event_action(&Method::DELETE, true), Some(EventAction::Destroy));
        assert_eq!(event_action(&Method::DELETE, false), None);
    }
}
