//! HTTP surface: routes, middleware and the OpenAPI document.

use crate::errors::AppError;
use crate::handlers::{self, AppState};
use crate::models::{
    ErrorBody, HealthStatus, PersonaTag, RawProfileView, SocialProfile, SoulEnvelope,
    SoulProfile, TagColor,
};
use axum::{
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request bodies are never expected; keep the cap small.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_soul, handlers::health),
    components(schemas(
        SoulEnvelope,
        SoulProfile,
        RawProfileView,
        SocialProfile,
        PersonaTag,
        TagColor,
        ErrorBody,
        HealthStatus
    )),
    tags(
        (name = "soul", description = "Behavioral identity profile and persona tags"),
        (name = "health", description = "Service liveness")
    )
)]
pub struct ApiDoc;

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    AppError::InternalError("Internal server error".to_string()).into_response()
}

fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let Some(origin) = client_url else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(e) => {
            tracing::warn!("Invalid CLIENT_URL '{}': {}; using permissive CORS", origin, e);
            CorsLayer::permissive()
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.client_url.as_deref());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        .route("/api/soul", get(handlers::missing_address))
        .route("/api/soul/", get(handlers::missing_address))
        .route("/api/soul/:address", get(handlers::get_soul))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
