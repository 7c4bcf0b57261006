//! Notification channels.
//!
//! This module provides the transports a notification can be delivered through:
//! - Discord webhooks
//! - Email (SMTP)
//! - Stdout (structured log sink)
//!
//! Teams and SMS are known channel types with configuration only; no
//! transport is registered for them.

mod discord;
mod email;
mod stdout;

pub use discord::{DiscordChannel, DiscordConfig};
pub use email::{EmailChannel, EmailConfig, EmailError};
pub use stdout::{StdoutChannel, StdoutConfig};

use async_trait::async_trait;

use crate::domain::{ChannelHealth, ChannelType, DeliveryOutcome, Metadata, PriorityLevel};

/// A transport that can deliver a notification and report its own health.
///
/// Implementations never return errors: every failure is folded into a
/// failed [`DeliveryOutcome`] or an unhealthy [`ChannelHealth`]. Channels are
/// immutable after construction and shared across concurrent dispatches.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// The channel type this instance serves.
    fn channel_type(&self) -> ChannelType;

    /// Whether the channel is enabled and has the credentials it needs.
    fn is_enabled(&self) -> bool;

    /// Make one delivery attempt.
    async fn send(
        &self,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
        recipient: Option<&str>,
    ) -> DeliveryOutcome;

    /// Lightweight reachability and configuration probe.
    async fn health_check(&self) -> ChannelHealth;
}
