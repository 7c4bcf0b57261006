//! Notification history route.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::api::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::api::models::{HistoryQuery, NotificationHistoryItem, NotificationHistoryResponse};
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/history", get(get_history))
}

/// Page through stored notifications, newest first.
#[utoipa::path(
    get,
    path = "/v1/history",
    tag = "notifications",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Matching notifications", body = NotificationHistoryResponse),
        (status = 422, description = "Invalid paging or filter", body = ApiErrorResponse),
        (status = 503, description = "History storage not configured", body = ApiErrorResponse)
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<NotificationHistoryResponse>> {
    let Query(query) = query?;
    let (limit, offset) = query.paging()?;

    let history = state.notification_service.history().ok_or_else(|| {
        ApiError::service_unavailable("Database not configured - history not available")
    })?;

    let (records, total) = history.list(&query.filter(), limit, offset).await?;

    Ok(Json(NotificationHistoryResponse {
        total,
        limit,
        offset,
        notifications: records.into_iter().map(NotificationHistoryItem::from).collect(),
    }))
}
