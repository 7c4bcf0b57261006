//! Notification dispatch.
//!
//! - [`channels`]: the transports (Discord, Email, Stdout)
//! - [`ChannelRegistry`]: channel type to transport, fixed at startup
//! - [`Dispatcher`]: one delivery with fixed-interval retries
//! - [`HealthProber`]: bounded, concurrent channel health checks
//! - [`NotificationService`]: validation, dispatch and history recording

pub mod channels;
pub mod dispatcher;
pub mod health;
pub mod registry;
pub mod service;

pub use channels::{DiscordConfig, EmailConfig, NotificationChannel, StdoutConfig};
pub use dispatcher::Dispatcher;
pub use health::{ChannelReport, HealthProber};
pub use registry::ChannelRegistry;
pub use service::{NotificationReceipt, NotificationService};
