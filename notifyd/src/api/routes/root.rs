//! Service info route.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::models::ServiceInfoResponse;
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(service_info))
}

/// Service name, version and where the docs live.
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service information", body = ServiceInfoResponse)
    )
)]
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        documentation: "/docs".to_string(),
    })
}
