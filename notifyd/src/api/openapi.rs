//! OpenAPI documentation configuration.
//!
//! The document is generated with `utoipa`, served at `/openapi.json`, and
//! browsable through Swagger UI at `/docs`.

use utoipa::OpenApi;

use crate::api::error::ApiErrorResponse;
use crate::api::models::{
    ChannelInfo, ChannelsResponse, HealthResponse, LivenessResponse, NotificationHistoryItem,
    NotificationHistoryResponse, NotificationResponse, ServiceInfoResponse,
};
use crate::domain::{ChannelType, HealthStatus, NotificationRequest, NotificationStatus, PriorityLevel};

/// OpenAPI documentation for the notification service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notifications Service",
        description = "Multi-channel notification dispatch: Discord, Email and Stdout, with delivery history.",
        license(name = "MIT OR Apache-2.0")
    ),
    tags(
        (name = "service", description = "Service information"),
        (name = "health", description = "Liveness and channel health"),
        (name = "notifications", description = "Sending notifications and querying history"),
        (name = "channels", description = "Channel configuration and status")
    ),
    paths(
        crate::api::routes::root::service_info,
        crate::api::routes::health::liveness,
        crate::api::routes::health::health_check,
        crate::api::routes::notify::notify,
        crate::api::routes::channels::list_channels,
        crate::api::routes::history::get_history,
    ),
    components(schemas(
        ApiErrorResponse,
        ChannelInfo,
        ChannelsResponse,
        ChannelType,
        HealthResponse,
        HealthStatus,
        LivenessResponse,
        NotificationHistoryItem,
        NotificationHistoryResponse,
        NotificationRequest,
        NotificationResponse,
        NotificationStatus,
        PriorityLevel,
        ServiceInfoResponse,
    ))
)]
pub struct ApiDoc;
