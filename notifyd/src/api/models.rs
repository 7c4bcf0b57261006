//! API request and response models (DTOs).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::models::NotificationRecordDbModel;
use crate::database::repositories::HistoryFilter;
use crate::domain::{ChannelType, HealthStatus, Metadata, NotificationStatus, PriorityLevel};
use crate::notification::{ChannelReport, NotificationReceipt};

/// Largest page `/v1/history` will return.
pub const HISTORY_MAX_LIMIT: i64 = 1000;

/// Page size when none is requested.
pub const HISTORY_DEFAULT_LIMIT: i64 = 100;

// ============================================================================
// Service
// ============================================================================

/// `GET /` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub documentation: String,
}

/// `GET /health` response. No channel probing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// `GET /v1/health` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Channel name to probe result.
    pub channels: BTreeMap<String, HealthStatus>,
}

// ============================================================================
// Notify
// ============================================================================

/// `POST /v1/notify` response, returned for delivered and failed alike.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub notification_id: String,
    pub status: NotificationStatus,
    pub channel: ChannelType,
    pub sent_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl From<NotificationReceipt> for NotificationResponse {
    fn from(receipt: NotificationReceipt) -> Self {
        Self {
            notification_id: receipt.notification_id,
            status: receipt.status,
            channel: receipt.channel,
            sent_at: receipt.sent_at,
            error: receipt.error,
        }
    }
}

// ============================================================================
// Channels
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelInfo {
    pub name: ChannelType,
    pub enabled: bool,
    pub status: HealthStatus,
    pub configured: bool,
    pub error: Option<String>,
}

impl From<ChannelReport> for ChannelInfo {
    fn from(report: ChannelReport) -> Self {
        Self {
            name: report.channel_type,
            enabled: report.enabled,
            status: report.health.status(),
            configured: report.enabled,
            error: report.health.error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelInfo>,
}

// ============================================================================
// History
// ============================================================================

/// Query parameters for `GET /v1/history`.
///
/// Paging values are signed so out-of-range input reaches validation and
/// gets a 422 instead of a parse failure.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Page size, 1 to 1000 (default: 100)
    #[serde(default = "default_history_limit")]
    pub limit: i64,
    /// Number of records to skip (default: 0)
    #[serde(default)]
    pub offset: i64,
    pub channel: Option<ChannelType>,
    pub status: Option<NotificationStatus>,
    pub priority: Option<PriorityLevel>,
    /// Matches `metadata.service`.
    pub service: Option<String>,
}

fn default_history_limit() -> i64 {
    HISTORY_DEFAULT_LIMIT
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: HISTORY_DEFAULT_LIMIT,
            offset: 0,
            channel: None,
            status: None,
            priority: None,
            service: None,
        }
    }
}

impl HistoryQuery {
    /// Checked `(limit, offset)`.
    pub fn paging(&self) -> crate::Result<(u32, u32)> {
        if !(1..=HISTORY_MAX_LIMIT).contains(&self.limit) {
            return Err(crate::Error::validation(format!(
                "limit must be between 1 and {}",
                HISTORY_MAX_LIMIT
            )));
        }
        let offset = u32::try_from(self.offset)
            .map_err(|_| crate::Error::validation("offset must be a non-negative integer"))?;
        Ok((self.limit as u32, offset))
    }

    pub fn filter(&self) -> HistoryFilter {
        HistoryFilter {
            channel: self.channel,
            status: self.status,
            priority: self.priority,
            service: self.service.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationHistoryItem {
    pub id: String,
    pub channel: String,
    pub message: String,
    pub priority: String,
    pub status: String,
    pub recipient: Option<String>,
    pub sent_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub metadata: Metadata,
    pub error: Option<String>,
}

impl From<NotificationRecordDbModel> for NotificationHistoryItem {
    fn from(record: NotificationRecordDbModel) -> Self {
        let metadata = record.metadata();
        let sent_at = record.sent_at();
        Self {
            id: record.id,
            channel: record.channel,
            message: record.message,
            priority: record.priority,
            status: record.status,
            recipient: record.recipient,
            sent_at,
            metadata,
            error: record.error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationHistoryResponse {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub notifications: Vec<NotificationHistoryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChannelHealth;

    #[test]
    fn test_history_query_paging_bounds() {
        assert_eq!(HistoryQuery::default().paging().unwrap(), (100, 0));

        let at_max = HistoryQuery {
            limit: 1000,
            offset: 5,
            ..Default::default()
        };
        assert_eq!(at_max.paging().unwrap(), (1000, 5));

        for (limit, offset) in [(0, 0), (1001, 0), (10, -1)] {
            let query = HistoryQuery {
                limit,
                offset,
                ..Default::default()
            };
            assert!(query.paging().is_err(), "limit={limit} offset={offset}");
        }
    }

    #[test]
    fn test_history_query_filter() {
        let query = HistoryQuery {
            channel: Some(ChannelType::Email),
            service: Some(String::new()),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.channel, Some(ChannelType::Email));
        assert!(filter.service.is_none());
    }

    #[test]
    fn test_channel_info_serialization() {
        let info = ChannelInfo::from(ChannelReport {
            channel_type: ChannelType::Discord,
            enabled: false,
            health: ChannelHealth::unhealthy("Discord webhook URL not configured"),
        });

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["name"], "discord");
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["configured"], false);
        assert_eq!(json["error"], "Discord webhook URL not configured");
    }
}
