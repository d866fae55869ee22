use crate::config::Config;
use crate::errors::AppError;
use crate::identifier::Identifier;
use crate::models::{ErrorBody, HealthStatus, SoulEnvelope};
use crate::orchestrator::Orchestrator;
use crate::response;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Provider fan-out for soul lookups.
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let orchestrator = Orchestrator::from_config(&config)?;
        Ok(Self {
            config,
            orchestrator,
        })
    }
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthStatus)),
    tag = "health"
)]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Soul identity API is running".to_string(),
    })
}

/// GET /api/soul/:address
///
/// Resolves an address (or name handle) into its raw identity profile and
/// persona tags. Provider outages never fail the request: a degraded or
/// fallback profile is returned with status 200.
#[utoipa::path(
    get,
    path = "/api/soul/{address}",
    params(("address" = String, Path, description = "0x address or name handle (e.g. vitalik.eth)")),
    responses(
        (status = 200, description = "Identity profile with persona tags", body = SoulEnvelope),
        (status = 400, description = "Missing or undecodable address", body = ErrorBody),
        (status = 500, description = "Unexpected failure", body = ErrorBody)
    ),
    tag = "soul"
)]
pub async fn get_soul(
    State(state): State<Arc<AppState>>,
    address: Result<Path<String>, PathRejection>,
) -> Result<Json<SoulEnvelope>, AppError> {
    let Path(address) = address.map_err(|rejection| {
        tracing::debug!("Rejected soul path: {}", rejection.body_text());
        AppError::BadRequest("Invalid address".to_string())
    })?;
    let id = Identifier::parse(&address)?;
    tracing::info!("GET /soul/{}", id);

    // Dropped with this future when the client goes away.
    let cancel = CancellationToken::new();
    let _cancel_guard = cancel.clone().drop_guard();

    let outcome = state.orchestrator.profile(&id, &cancel).await;
    let soul = response::build(id, outcome);

    tracing::info!(
        "Soul for {}: primary={:?}, {} tag(s)",
        soul.address,
        soul.tags.first().map(|t| t.label.as_str()),
        soul.tags.len()
    );

    Ok(Json(SoulEnvelope::ok(soul)))
}

/// GET /api/soul with no address segment.
pub async fn missing_address() -> AppError {
    AppError::BadRequest("Missing address".to_string())
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
