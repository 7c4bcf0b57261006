//! History database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::time::{datetime_to_ms, ms_to_datetime, now_ms};
use crate::domain::{DeliveryOutcome, Metadata, NotificationRequest};

/// One dispatched notification as stored in `notifications`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct NotificationRecordDbModel {
    pub id: String,
    pub channel: String,
    pub message: String,
    pub priority: String,
    pub status: String,
    pub recipient: Option<String>,
    /// JSON object text.
    pub metadata: String,
    pub error: Option<String>,
    /// Unix epoch milliseconds (UTC).
    pub sent_at: i64,
    /// Unix epoch milliseconds (UTC).
    pub created_at: i64,
}

impl NotificationRecordDbModel {
    /// Record for `request` with the terminal `outcome` of its dispatch.
    pub fn new(
        id: impl Into<String>,
        request: &NotificationRequest,
        outcome: &DeliveryOutcome,
        sent_at: DateTime<Utc>,
    ) -> crate::Result<Self> {
        Ok(Self {
            id: id.into(),
            channel: request.channel.as_str().to_string(),
            message: request.message.clone(),
            priority: request.priority.as_str().to_string(),
            status: outcome.status.as_str().to_string(),
            recipient: request.recipient.clone(),
            metadata: serde_json::to_string(&request.metadata)?,
            error: outcome.error.clone(),
            sent_at: datetime_to_ms(sent_at),
            created_at: now_ms(),
        })
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        ms_to_datetime(self.sent_at)
    }

    /// Parsed metadata. Rows written by other tools may hold non-object JSON;
    /// those read back as empty.
    pub fn metadata(&self) -> Metadata {
        serde_json::from_str(&self.metadata).unwrap_or_default()
    }
}
