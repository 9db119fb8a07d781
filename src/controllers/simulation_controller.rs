use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::config::{Config, SimulationDefaults};
use crate::error::ApiError;
use crate::models::api::{HealthStatus, SimulateRequest, SimulateResponse};
use crate::services::simulation_service;
use crate::shared_state::AppState;

/// POST /api/simulate
/// Run the solar-thermal loop simulation
///
/// Computes hourly fluid, panel, tank and ambient temperatures (°F). Pass
/// `startHour` with `currentState` to continue an earlier run from that step.
#[utoipa::path(
    post,
    path = "/api/simulate",
    request_body = SimulateRequest,
    responses(
        (status = 200, description = "Hourly temperatures", body = SimulateResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || {
        simulation_service::run(&request, &config.defaults, config.max_duration_steps)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("simulation task failed: {e}")))??;

    let total = state.record_run();
    info!(steps = response.temperatures.len(), runs_completed = total, "simulation served");
    Ok(Json(response))
}

/// GET /api/simulation/defaults
/// Default simulation parameters
///
/// Values applied to any field a simulate request omits. Temperatures in °C.
#[utoipa::path(
    get,
    path = "/api/simulation/defaults",
    responses(
        (status = 200, description = "Configured defaults", body = SimulationDefaults)
    )
)]
pub async fn get_defaults(State(config): State<Arc<Config>>) -> Json<SimulationDefaults> {
    Json(config.defaults.clone())
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        runs_completed: state.runs_completed(),
    })
}
