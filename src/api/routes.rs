//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{authenticate, authorize_event_action};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_events,
        handlers::get_event,
        handlers::create_event,
        handlers::update_event,
        handlers::partial_update_event,
        handlers::delete_event,
        handlers::health_check,
        handlers::login,
        handlers::get_current_user,
    ),
    components(schemas(
        crate::api::types::ListEventsQuery,
        crate::api::types::ListEventsResponse,
        crate::api::types::HealthResponse,
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::UserInfo,
        crate::domain::Event,
        crate::domain::NewEvent,
        crate::domain::EventPatch,
        crate::domain::UserRole,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "events", description = "Event resource"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Event Service API",
        version = "0.1.0",
        description = "Permission-gated CRUD over community events",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Event and profile routes resolve the caller from an optional bearer
/// token; login and health are outside that layer. The event routes also
/// enforce the read/write permission rule before their extractors run.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let event_routes = Router::new()
        .route(
            "/v1/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/v1/events/:id",
            get(handlers::get_event)
                .put(handlers::update_event)
                .patch(handlers::partial_update_event)
                .delete(handlers::delete_event),
        )
        .route_layer(middleware::from_fn(authorize_event_action))
        .route("/v1/auth/me", get(handlers::get_current_user))
        .layer(middleware::from_fn_with_state(
            state.jwt_manager.clone(),
            authenticate,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/auth/login", post(handlers::login))
        .with_state(state);

    Router::new()
        .merge(event_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
