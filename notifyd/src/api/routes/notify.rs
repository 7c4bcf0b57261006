//! Notification dispatch route.

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};

use crate::api::error::{ApiErrorResponse, ApiResult};
use crate::api::models::NotificationResponse;
use crate::api::server::AppState;
use crate::domain::NotificationRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/notify", post(notify))
}

/// Send a notification through one channel.
///
/// Delivery failures are reported in the body with status `failed`; only
/// malformed requests produce an error status.
#[utoipa::path(
    post,
    path = "/v1/notify",
    tag = "notifications",
    request_body = NotificationRequest,
    responses(
        (status = 200, description = "Dispatch finished", body = NotificationResponse),
        (status = 422, description = "Invalid request", body = ApiErrorResponse)
    )
)]
pub async fn notify(
    State(state): State<AppState>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> ApiResult<Json<NotificationResponse>> {
    let Json(request) = payload?;
    let receipt = state.notification_service.notify(&request).await?;
    Ok(Json(receipt.into()))
}
