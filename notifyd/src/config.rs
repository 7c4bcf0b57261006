//! Service configuration.
//!
//! Settings are read once at startup from `NOTIFICATIONS_*` environment
//! variables and never change afterwards. Components receive the pieces they
//! need by value; nothing reads the environment after [`Settings::from_env`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ::config::{Config, Environment, Map};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::domain::RetryPolicy;
use crate::notification::channels::{DiscordConfig, EmailConfig, StdoutConfig};

/// Prefix shared by every setting, joined to the key with `_`.
pub const ENV_PREFIX: &str = "NOTIFICATIONS";

/// A credential or endpoint that must not appear in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Process log level, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` level directive for this setting.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, String> {
        value.parse()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl TryFrom<String> for LogFormat {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, String> {
        value.parse()
    }
}

/// Microsoft Teams settings. Accepted and reported, no transport yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamsConfig {
    pub enabled: bool,
    pub webhook_url: Option<Secret>,
}

/// Twilio SMS settings. Accepted and reported, no transport yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsConfig {
    pub enabled: bool,
    pub account_sid: Option<String>,
    pub auth_token: Option<Secret>,
    pub from_number: Option<String>,
}

/// Rate limit settings. Not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: 60,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service_name: String,
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// History storage. `None` disables it.
    pub database_url: Option<String>,

    pub discord: DiscordConfig,
    pub email: EmailConfig,
    pub stdout: StdoutConfig,
    pub teams: TeamsConfig,
    pub sms: SmsConfig,
    pub rate_limit: RateLimitConfig,

    pub retry: RetryPolicy,
    /// Upper bound on a single channel health probe.
    pub probe_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_name: "notifications".to_string(),
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            database_url: None,
            discord: DiscordConfig::default(),
            email: EmailConfig::default(),
            stdout: StdoutConfig::default(),
            teams: TeamsConfig::default(),
            sms: SmsConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryPolicy::default(),
            probe_timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Variable suffixes are matched case-insensitively. Call
    /// `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::load(std::env::var("PORT").ok(), None)
    }

    /// Load settings from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let bare_port = vars
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("PORT"))
            .map(|(_, value)| value.clone());
        Self::load(bare_port, Some(vars))
    }

    /// Bare `PORT` sits below the prefixed variables.
    fn load(bare_port: Option<String>, vars: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(port) = bare_port.filter(|port| !port.is_empty()) {
            builder = builder.set_default("port", port)?;
        }

        let env: EnvSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .ignore_empty(true)
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;

        Ok(env.into())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Flat view of the `NOTIFICATIONS_*` variables, one field per suffix.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct EnvSettings {
    service_name: String,
    environment: String,
    host: String,
    port: u16,
    log_level: LogLevel,
    log_format: LogFormat,
    database_url: Option<String>,

    discord_enabled: bool,
    discord_webhook_url: Option<Secret>,

    email_enabled: bool,
    smtp_host: String,
    smtp_port: u16,
    smtp_username: Option<String>,
    smtp_password: Option<Secret>,
    smtp_from_address: String,
    smtp_use_tls: bool,
    email_product_label: String,

    teams_enabled: bool,
    teams_webhook_url: Option<Secret>,

    sms_enabled: bool,
    twilio_account_sid: Option<String>,
    twilio_auth_token: Option<Secret>,
    twilio_from_number: Option<String>,

    stdout_enabled: bool,

    rate_limit_enabled: bool,
    rate_limit_per_minute: u32,

    max_retries: u32,
    retry_delay_seconds: u64,
    probe_timeout_seconds: u64,
}

impl Default for EnvSettings {
    fn default() -> Self {
        let defaults = Settings::default();
        Self {
            service_name: defaults.service_name,
            environment: defaults.environment,
            host: defaults.host,
            port: defaults.port,
            log_level: defaults.log_level,
            log_format: defaults.log_format,
            database_url: defaults.database_url,
            discord_enabled: defaults.discord.enabled,
            discord_webhook_url: defaults.discord.webhook_url,
            email_enabled: defaults.email.enabled,
            smtp_host: defaults.email.smtp_host,
            smtp_port: defaults.email.smtp_port,
            smtp_username: defaults.email.smtp_username,
            smtp_password: defaults.email.smtp_password,
            smtp_from_address: defaults.email.from_address,
            smtp_use_tls: defaults.email.use_tls,
            email_product_label: defaults.email.product_label,
            teams_enabled: defaults.teams.enabled,
            teams_webhook_url: defaults.teams.webhook_url,
            sms_enabled: defaults.sms.enabled,
            twilio_account_sid: defaults.sms.account_sid,
            twilio_auth_token: defaults.sms.auth_token,
            twilio_from_number: defaults.sms.from_number,
            stdout_enabled: defaults.stdout.enabled,
            rate_limit_enabled: defaults.rate_limit.enabled,
            rate_limit_per_minute: defaults.rate_limit.per_minute,
            max_retries: defaults.retry.max_retries,
            retry_delay_seconds: defaults.retry.retry_delay_secs,
            probe_timeout_seconds: defaults.probe_timeout_secs,
        }
    }
}

impl From<EnvSettings> for Settings {
    fn from(env: EnvSettings) -> Self {
        Self {
            service_name: env.service_name,
            environment: env.environment,
            host: env.host,
            port: env.port,
            log_level: env.log_level,
            log_format: env.log_format,
            database_url: env.database_url.filter(|url| !url.trim().is_empty()),
            discord: DiscordConfig {
                enabled: env.discord_enabled,
                webhook_url: env.discord_webhook_url,
            },
            email: EmailConfig {
                enabled: env.email_enabled,
                smtp_host: env.smtp_host,
                smtp_port: env.smtp_port,
                smtp_username: env.smtp_username,
                smtp_password: env.smtp_password,
                from_address: env.smtp_from_address,
                use_tls: env.smtp_use_tls,
                product_label: env.email_product_label,
            },
            stdout: StdoutConfig {
                enabled: env.stdout_enabled,
            },
            teams: TeamsConfig {
                enabled: env.teams_enabled,
                webhook_url: env.teams_webhook_url,
            },
            sms: SmsConfig {
                enabled: env.sms_enabled,
                account_sid: env.twilio_account_sid,
                auth_token: env.twilio_auth_token,
                from_number: env.twilio_from_number,
            },
            rate_limit: RateLimitConfig {
                enabled: env.rate_limit_enabled,
                per_minute: env.rate_limit_per_minute,
            },
            retry: RetryPolicy::new(env.max_retries, env.retry_delay_seconds),
            probe_timeout_secs: env.probe_timeout_seconds,
        }
    }
}
