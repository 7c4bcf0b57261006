//! Notification request and delivery outcome types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PriorityLevel;
use crate::{Error, Result};

/// Minimum message length in characters.
pub const MESSAGE_MIN_CHARS: usize = 1;

/// Maximum message length in characters.
pub const MESSAGE_MAX_CHARS: usize = 4096;

/// Free-form key/value details attached to a notification.
///
/// Keys are sorted so every formatter renders them deterministically.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Transport a notification is delivered through.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChannelType {
    Discord,
    Email,
    Teams,
    Sms,
    Stdout,
}

impl ChannelType {
    /// Every known channel type, in reporting order.
    pub const ALL: [ChannelType; 5] = [
        Self::Discord,
        Self::Email,
        Self::Teams,
        Self::Sms,
        Self::Stdout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Email => "email",
            Self::Teams => "teams",
            Self::Sms => "sms",
            Self::Stdout => "stdout",
        }
    }
}

/// Delivery status of a notification.
///
/// Dispatch only ever produces `Delivered` or `Failed`; the remaining
/// variants exist for history records and clients.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
    Retrying,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Retrying => "retrying",
        }
    }
}

/// Request to send a single notification.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NotificationRequest {
    /// Channel to deliver through.
    pub channel: ChannelType,
    /// Message body, 1 to 4096 characters.
    pub message: String,
    /// Priority, defaults to `normal`.
    #[serde(default)]
    pub priority: PriorityLevel,
    /// Additional details (service, error, ...).
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Metadata,
    /// Address for channels that need one (email address, phone number).
    #[serde(default)]
    pub recipient: Option<String>,
}

impl NotificationRequest {
    pub fn new(channel: ChannelType, message: impl Into<String>) -> Self {
        Self {
            channel,
            message: message.into(),
            priority: PriorityLevel::default(),
            metadata: Metadata::new(),
            recipient: None,
        }
    }

    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Check caller-side invariants. Length is counted in characters.
    pub fn validate(&self) -> Result<()> {
        let len = self.message.chars().count();
        if len < MESSAGE_MIN_CHARS {
            return Err(Error::validation("message must not be empty"));
        }
        if len > MESSAGE_MAX_CHARS {
            return Err(Error::validation(format!(
                "message must be at most {} characters (got {})",
                MESSAGE_MAX_CHARS, len
            )));
        }
        Ok(())
    }
}

/// Terminal result of one attempt or one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub status: NotificationStatus,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered() -> Self {
        Self {
            status: NotificationStatus::Delivered,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: NotificationStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == NotificationStatus::Failed
    }
}

/// Render a metadata value the way it appears to humans: strings bare,
/// everything else as compact JSON.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
