//! Channel health value types.

use serde::{Deserialize, Serialize};

/// Reported health of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Result of a channel health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHealth {
    pub healthy: bool,
    pub error: Option<String>,
}

impl ChannelHealth {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            error: Some(error.into()),
        }
    }

    pub fn status(&self) -> HealthStatus {
        if self.healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_constructors() {
        let ok = ChannelHealth::healthy();
        assert_eq!(ok.status(), HealthStatus::Healthy);
        assert!(ok.error.is_none());

        let bad = ChannelHealth::unhealthy("SMTP credentials not configured");
        assert_eq!(bad.status(), HealthStatus::Unhealthy);
        assert_eq!(bad.status().to_string(), "unhealthy");
        assert!(bad.error.unwrap().contains("not configured"));
    }
}
