//! Discord webhook notification channel.
//!
//! Each notification becomes a single embed: a priority-tagged title, the
//! message as description, a priority color, a UTC timestamp and one inline
//! field per metadata entry.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::NotificationChannel;
use crate::config::Secret;
use crate::domain::{
    ChannelHealth, ChannelType, DeliveryOutcome, Metadata, PriorityLevel, display_value,
};
use crate::utils::http_client;

/// Timeout for a webhook POST.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the health probe GET.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Discord channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Whether the channel is enabled.
    pub enabled: bool,
    /// Discord webhook URL.
    pub webhook_url: Option<Secret>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
        }
    }
}

/// Discord notification channel.
pub struct DiscordChannel {
    config: DiscordConfig,
    client: Client,
}

impl DiscordChannel {
    /// Create a new Discord channel.
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            config,
            client: http_client::build_client(),
        }
    }

    fn webhook_url(&self) -> Option<&str> {
        if !self.config.enabled {
            return None;
        }
        self.config.webhook_url.as_ref().map(Secret::expose)
    }

    /// Get the embed color based on priority.
    pub fn get_color(priority: PriorityLevel) -> u32 {
        match priority {
            PriorityLevel::Low => 0x3498db,      // Blue
            PriorityLevel::Normal => 0x2ecc71,   // Green
            PriorityLevel::High => 0xf39c12,     // Orange
            PriorityLevel::Critical => 0xe74c3c, // Red
        }
    }

    /// Glyph prefixed to the embed title.
    fn get_glyph(priority: PriorityLevel) -> &'static str {
        match priority {
            PriorityLevel::Low => "ℹ️",
            PriorityLevel::Normal => "📢",
            PriorityLevel::High => "⚠️",
            PriorityLevel::Critical => "🚨",
        }
    }

    /// Build the webhook payload.
    pub fn build_payload(
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
    ) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = metadata
            .iter()
            .map(|(key, value)| {
                json!({
                    "name": humanize_key(key),
                    "value": display_value(value),
                    "inline": true,
                })
            })
            .collect();

        json!({
            "embeds": [{
                "title": format!("{} {} Alert", Self::get_glyph(priority), priority.label()),
                "description": message,
                "color": Self::get_color(priority),
                "timestamp": Utc::now().to_rfc3339(),
                "fields": fields,
            }]
        })
    }
}

/// `service_name` -> `Service Name`.
///
/// Underscores become spaces; the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased.
fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for c in key.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[async_trait]
impl NotificationChannel for DiscordChannel {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Discord
    }

    fn is_enabled(&self) -> bool {
        self.webhook_url().is_some()
    }

    async fn send(
        &self,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
        _recipient: Option<&str>,
    ) -> DeliveryOutcome {
        let Some(url) = self.webhook_url() else {
            return DeliveryOutcome::failed("Discord channel not configured");
        };

        let payload = Self::build_payload(message, priority, metadata);

        match self
            .client
            .post(url)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
                    debug!(%priority, "Discord notification sent");
                    DeliveryOutcome::delivered()
                } else {
                    let error = format!("Discord webhook returned {}", status.as_u16());
                    warn!("{}", error);
                    DeliveryOutcome::failed(error)
                }
            }
            Err(e) => {
                let error = format!("Discord send failed: {}", e);
                warn!("{}", error);
                DeliveryOutcome::failed(error)
            }
        }
    }

    async fn health_check(&self) -> ChannelHealth {
        let Some(url) = self.webhook_url() else {
            return ChannelHealth::unhealthy("Discord webhook URL not configured");
        };

        // Discord answers GET on a webhook URL with the webhook's metadata.
        match self.client.get(url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) if response.status() == StatusCode::OK => ChannelHealth::healthy(),
            Ok(response) => {
                ChannelHealth::unhealthy(format!("Webhook returned {}", response.status().as_u16()))
            }
            Err(e) => ChannelHealth::unhealthy(format!("Health check failed: {}", e)),
        }
    }
}
