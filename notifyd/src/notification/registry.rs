//! Channel registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::channels::{DiscordChannel, EmailChannel, NotificationChannel, StdoutChannel};
use crate::config::Settings;
use crate::domain::ChannelType;

/// Fixed map from channel type to its transport, built once at startup.
///
/// Iteration follows [`ChannelType`] order, which keeps reports stable.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<ChannelType, Arc<dyn NotificationChannel>>,
}

impl ChannelRegistry {
    /// Empty registry. Tests use this to install mock channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discord, Email and Stdout, configured from `settings`.
    ///
    /// Unconfigured channels are still registered and report themselves
    /// disabled.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_channel(Arc::new(DiscordChannel::new(settings.discord.clone())))
            .with_channel(Arc::new(EmailChannel::new(settings.email.clone())))
            .with_channel(Arc::new(StdoutChannel::new(settings.stdout.clone())))
    }

    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.register(channel);
        self
    }

    /// Register `channel` under its own type, replacing any previous entry.
    pub fn register(&mut self, channel: Arc<dyn NotificationChannel>) {
        let channel_type = channel.channel_type();
        debug!(channel = %channel_type, enabled = channel.is_enabled(), "Registered channel");
        self.channels.insert(channel_type, channel);
    }

    pub fn get(&self, channel_type: ChannelType) -> Option<&Arc<dyn NotificationChannel>> {
        self.channels.get(&channel_type)
    }

    pub fn channel_types(&self) -> impl Iterator<Item = ChannelType> + '_ {
        self.channels.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChannelType, &Arc<dyn NotificationChannel>)> {
        self.channels.iter().map(|(t, c)| (*t, c))
    }
}
