//! Channel health probing.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::debug;

use super::registry::ChannelRegistry;
use crate::domain::{ChannelHealth, ChannelType};

/// Health of one registered channel, as reported by `/v1/channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    pub channel_type: ChannelType,
    pub enabled: bool,
    pub health: ChannelHealth,
}

/// Runs channel health checks with a per-probe time limit.
#[derive(Clone)]
pub struct HealthProber {
    registry: Arc<ChannelRegistry>,
    probe_timeout: Duration,
}

impl HealthProber {
    pub fn new(registry: Arc<ChannelRegistry>, probe_timeout: Duration) -> Self {
        Self {
            registry,
            probe_timeout,
        }
    }

    /// Probe one channel. Unknown channels are reported unhealthy.
    pub async fn check(&self, channel_type: ChannelType) -> ChannelHealth {
        let Some(channel) = self.registry.get(channel_type) else {
            return ChannelHealth::unhealthy("Channel not found");
        };

        match timeout(self.probe_timeout, channel.health_check()).await {
            Ok(health) => {
                debug!(channel = %channel_type, healthy = health.healthy, "Channel probed");
                health
            }
            Err(_) => ChannelHealth::unhealthy(format!(
                "Health check timed out after {}s",
                self.probe_timeout.as_secs()
            )),
        }
    }

    /// Probe every registered channel concurrently, in registry order.
    pub async fn check_all(&self) -> Vec<ChannelReport> {
        let probes = self.registry.iter().map(|(channel_type, channel)| async move {
            ChannelReport {
                channel_type,
                enabled: channel.is_enabled(),
                health: self.check(channel_type).await,
            }
        });
        join_all(probes).await
    }
}
