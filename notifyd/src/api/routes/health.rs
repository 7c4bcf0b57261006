//! Health check routes.

use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use crate::api::models::{HealthResponse, LivenessResponse};
use crate::api::server::AppState;

/// `/health`, answered without touching any channel.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}

/// `/health` under `/v1`, with every channel probed.
pub fn v1_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = LivenessResponse)
    )
)]
pub async fn liveness(State(state): State<AppState>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "healthy".to_string(),
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Service health with per-channel probe results.
///
/// The service itself reports healthy even when channels are not.
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and channel health", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let channels: BTreeMap<String, _> = state
        .health_prober
        .check_all()
        .await
        .into_iter()
        .map(|report| (report.channel_type.to_string(), report.health.status()))
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        channels,
    })
}
