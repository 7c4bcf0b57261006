//! Domain value types shared by channels, the dispatcher and the API.

pub mod health;
pub mod notification;
pub mod priority;
pub mod retry_policy;

pub use health::{ChannelHealth, HealthStatus};
pub use notification::{
    ChannelType, DeliveryOutcome, MESSAGE_MAX_CHARS, MESSAGE_MIN_CHARS, Metadata,
    NotificationRequest, NotificationStatus, display_value,
};
pub use priority::PriorityLevel;
pub use retry_policy::RetryPolicy;
