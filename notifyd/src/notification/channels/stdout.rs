//! Stdout notification channel.
//!
//! Lines go through `tracing` under the `notifyd::stdout` target, so they land
//! wherever the process log goes and can be filtered independently.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::NotificationChannel;
use crate::domain::{ChannelHealth, ChannelType, DeliveryOutcome, Metadata, PriorityLevel};
use crate::logging::STDOUT_CHANNEL_TARGET;

/// Stdout channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdoutConfig {
    /// Whether the channel is enabled. Reported only; sending ignores it.
    pub enabled: bool,
}

impl Default for StdoutConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Stdout notification channel.
pub struct StdoutChannel {
    config: StdoutConfig,
}

impl StdoutChannel {
    pub fn new(config: StdoutConfig) -> Self {
        Self { config }
    }

    /// `[<ts>] [<PRIORITY>] <message>`, plus ` | metadata=<json>` when present.
    pub fn format_line(
        timestamp: DateTime<Utc>,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
    ) -> Result<String, serde_json::Error> {
        let mut line = format!(
            "[{}] [{}] {}",
            timestamp.to_rfc3339(),
            priority.label(),
            message
        );
        if !metadata.is_empty() {
            line.push_str(" | metadata=");
            line.push_str(&serde_json::to_string(metadata)?);
        }
        Ok(line)
    }
}

#[async_trait]
impl NotificationChannel for StdoutChannel {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Stdout
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn send(
        &self,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
        _recipient: Option<&str>,
    ) -> DeliveryOutcome {
        let line = match Self::format_line(Utc::now(), message, priority, metadata) {
            Ok(line) => line,
            Err(e) => return DeliveryOutcome::failed(format!("Stdout write failed: {}", e)),
        };

        match priority {
            PriorityLevel::Critical => {
                error!(target: STDOUT_CHANNEL_TARGET, critical = true, "{}", line)
            }
            PriorityLevel::High => warn!(target: STDOUT_CHANNEL_TARGET, "{}", line),
            PriorityLevel::Low | PriorityLevel::Normal => {
                info!(target: STDOUT_CHANNEL_TARGET, "{}", line)
            }
        }

        DeliveryOutcome::delivered()
    }

    async fn health_check(&self) -> ChannelHealth {
        ChannelHealth::healthy()
    }
}
