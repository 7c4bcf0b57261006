//! Logging setup.
//!
//! One `tracing_subscriber` registry with an `EnvFilter` and a console fmt
//! layer, either human-readable or JSON. `RUST_LOG` overrides the configured
//! level entirely.

use chrono::Utc;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LogLevel, Settings};

/// Target used by the stdout notification channel.
pub const STDOUT_CHANNEL_TARGET: &str = "notifyd::stdout";

/// RFC 3339 UTC timestamps with millisecond precision.
#[derive(Debug, Clone, Copy)]
struct UtcTimer;

impl FormatTime for UtcTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_filter(level: LogLevel) -> String {
    let level = level.as_directive();
    format!("notifyd={level},sqlx=warn,tower_http=info")
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(settings: &Settings) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(settings.log_level)));

    let (text, json) = match settings.log_format {
        LogFormat::Text => (Some(fmt::layer().with_ansi(true).with_timer(UtcTimer)), None),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_timer(UtcTimer),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .map_err(|e| {
            crate::Error::Other(format!("Failed to set global default subscriber: {}", e))
        })?;

    Ok(())
}
