//! Channel listing route.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::models::{ChannelInfo, ChannelsResponse};
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/channels", get(list_channels))
}

/// List registered channels with their configuration and live health.
#[utoipa::path(
    get,
    path = "/v1/channels",
    tag = "channels",
    responses(
        (status = 200, description = "Registered channels", body = ChannelsResponse)
    )
)]
pub async fn list_channels(State(state): State<AppState>) -> Json<ChannelsResponse> {
    let channels = state
        .health_prober
        .check_all()
        .await
        .into_iter()
        .map(ChannelInfo::from)
        .collect();

    Json(ChannelsResponse { channels })
}
