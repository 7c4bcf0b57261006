//! Delivery with fixed-interval retries.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::registry::ChannelRegistry;
use crate::domain::{
    ChannelType, DeliveryOutcome, Metadata, NotificationRequest, PriorityLevel, RetryPolicy,
};

/// Resolves a channel and drives attempts until one succeeds or the retry
/// budget runs out.
///
/// A dispatch makes at most `max_retries + 1` calls to the channel and never
/// returns an error; unknown channels fail without any I/O.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ChannelRegistry>,
    retry_policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(registry: Arc<ChannelRegistry>, retry_policy: RetryPolicy) -> Self {
        Self {
            registry,
            retry_policy,
        }
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub async fn dispatch_request(&self, request: &NotificationRequest) -> DeliveryOutcome {
        self.dispatch(
            request.channel,
            &request.message,
            request.priority,
            &request.metadata,
            request.recipient.as_deref(),
        )
        .await
    }

    pub async fn dispatch(
        &self,
        channel_type: ChannelType,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
        recipient: Option<&str>,
    ) -> DeliveryOutcome {
        let Some(channel) = self.registry.get(channel_type) else {
            warn!(channel = %channel_type, "Dispatch to unsupported channel");
            return DeliveryOutcome::failed(format!("Channel {} not supported", channel_type));
        };

        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt: u32 = 1;
        loop {
            let outcome = channel.send(message, priority, metadata, recipient).await;

            if !outcome.is_failed() {
                if attempt > 1 {
                    info!(channel = %channel_type, attempt, "Notification delivered after retry");
                }
                return outcome;
            }

            if attempt >= max_attempts {
                warn!(
                    channel = %channel_type,
                    attempts = attempt,
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "Notification failed, retries exhausted"
                );
                return outcome;
            }

            debug!(
                channel = %channel_type,
                attempt,
                max_attempts,
                delay_secs = self.retry_policy.retry_delay_secs,
                error = outcome.error.as_deref().unwrap_or_default(),
                "Delivery attempt failed, retrying"
            );
            sleep(self.retry_policy.delay()).await;
            // attempt < max_attempts, so this cannot overflow.
            attempt += 1;
        }
    }
}
