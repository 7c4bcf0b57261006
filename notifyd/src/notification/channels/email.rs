//! Email notification channel using SMTP.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::NotificationChannel;
use crate::config::Secret;
use crate::domain::{
    ChannelHealth, ChannelType, DeliveryOutcome, Metadata, PriorityLevel, display_value,
};
use crate::utils::http_client::install_rustls_provider;

/// Timeout for a full SMTP send.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the connect-and-authenticate probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const PASSWORD_MISSING: &str = "SMTP password not configured";

/// Port on which SMTP speaks TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Error type for a single email attempt.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, timeout).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Email channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Whether the channel is enabled.
    pub enabled: bool,
    /// SMTP server host.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
    /// SMTP username. The channel is disabled without one.
    pub smtp_username: Option<String>,
    /// SMTP password.
    pub smtp_password: Option<Secret>,
    /// Sender email address.
    pub from_address: String,
    /// Use TLS (implicit on port 465, STARTTLS otherwise).
    pub use_tls: bool,
    /// Product name shown in the subject line.
    pub product_label: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from_address: "notifications@spectra.cloud".to_string(),
            use_tls: true,
            product_label: "SPECTRA".to_string(),
        }
    }
}

/// Email notification channel.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    /// Create a new Email channel.
    pub fn new(config: EmailConfig) -> Self {
        install_rustls_provider();
        Self { config }
    }

    /// Build the email subject.
    pub fn build_subject(&self, priority: PriorityLevel) -> String {
        format!("[{}] {} Alert", priority.label(), self.config.product_label)
    }

    /// Build the plain-text body: the message, then an optional details block.
    pub fn build_body(message: &str, metadata: &Metadata) -> String {
        let mut body = format!("{}\n\n", message);
        if !metadata.is_empty() {
            body.push_str("Details:\n");
            for (key, value) in metadata {
                body.push_str(&format!("  {}: {}\n", key, display_value(value)));
            }
        }
        body
    }

    fn build_message(
        &self,
        recipient: &str,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
    ) -> Result<Message, EmailError> {
        Ok(Message::builder()
            .from(self.config.from_address.parse()?)
            .to(recipient.parse()?)
            .subject(self.build_subject(priority))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::build_body(message, metadata))?)
    }

    /// AUTH credentials. A username without a password is a configuration
    /// fault, never an unauthenticated session.
    fn credentials(&self) -> Option<Credentials> {
        let username = self.config.smtp_username.as_ref()?;
        let password = self.config.smtp_password.as_ref()?;
        Some(Credentials::new(
            username.clone(),
            password.expose().to_string(),
        ))
    }

    fn transport(
        &self,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let host = self.config.smtp_host.as_str();
        let builder = if !self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        } else if self.config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };

        Ok(builder
            .port(self.config.smtp_port)
            .timeout(Some(timeout))
            .credentials(credentials)
            .build())
    }

    async fn try_send(
        &self,
        credentials: Credentials,
        recipient: &str,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
    ) -> Result<(), EmailError> {
        let email = self.build_message(recipient, message, priority, metadata)?;
        self.transport(credentials, SEND_TIMEOUT)?.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Email
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.smtp_username.is_some()
    }

    async fn send(
        &self,
        message: &str,
        priority: PriorityLevel,
        metadata: &Metadata,
        recipient: Option<&str>,
    ) -> DeliveryOutcome {
        let Some(recipient) = recipient.map(str::trim).filter(|r| !r.is_empty()) else {
            return DeliveryOutcome::failed("Email recipient required");
        };

        if !self.is_enabled() {
            return DeliveryOutcome::failed("Email channel not configured");
        }
        let Some(credentials) = self.credentials() else {
            return DeliveryOutcome::failed(PASSWORD_MISSING);
        };

        match self
            .try_send(credentials, recipient, message, priority, metadata)
            .await
        {
            Ok(()) => {
                info!(to = recipient, %priority, "Email notification sent");
                DeliveryOutcome::delivered()
            }
            Err(e) => {
                let error = format!("Email send failed: {}", e);
                warn!(to = recipient, "{}", error);
                DeliveryOutcome::failed(error)
            }
        }
    }

    async fn health_check(&self) -> ChannelHealth {
        if !self.is_enabled() {
            return ChannelHealth::unhealthy("SMTP credentials not configured");
        }

        let Some(credentials) = self.credentials() else {
            return ChannelHealth::unhealthy(PASSWORD_MISSING);
        };

        // Connecting runs EHLO, TLS negotiation and AUTH.
        let result = match self.transport(credentials, PROBE_TIMEOUT) {
            Ok(transport) => transport.test_connection().await.map_err(EmailError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(true) => ChannelHealth::healthy(),
            Ok(false) => ChannelHealth::unhealthy("SMTP connection failed: server not responding"),
            Err(e) => ChannelHealth::unhealthy(format!("SMTP connection failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Plain SMTP server on a loopback port that offers AUTH and rejects
    /// every attempt. Returns the port and the commands it received.
    async fn smtp_server_rejecting_auth() -> (u16, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let commands = Arc::new(Mutex::new(Vec::new()));

        let received = commands.clone();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut lines = BufReader::new(reader).lines();
            writer.write_all(b"220 localhost ESMTP\r\n").await.unwrap();

            while let Ok(Some(line)) = lines.next_line().await {
                received.lock().unwrap().push(line.clone());
                let verb = line
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_ascii_uppercase();
                let reply: &[u8] = match verb.as_str() {
                    "EHLO" => b"250-localhost\r\n250 AUTH PLAIN LOGIN\r\n",
                    "AUTH" => b"535 5.7.8 Authentication credentials invalid\r\n",
                    "QUIT" => b"221 Bye\r\n",
                    _ => b"250 OK\r\n",
                };
                if writer.write_all(reply).await.is_err() || verb == "QUIT" {
                    break;
                }
            }
        });

        (port, commands)
    }

    fn configured() -> EmailConfig {
        EmailConfig {
            smtp_host: "127.0.0.1".to_string(),
            // Nothing listens on the discard port, so connects are refused.
            smtp_port: 9,
            smtp_username: Some("test@test.com".to_string()),
            smtp_password: Some(Secret::new("password")),
            use_tls: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert!(config.enabled);
        assert_eq!(config.smtp_port, 587);
        assert!(config.use_tls);
        assert!(config.smtp_username.is_none());
    }

    #[test]
    fn test_email_channel_disabled_without_username() {
        let channel = EmailChannel::new(EmailConfig::default());
        assert!(!channel.is_enabled());
        assert!(EmailChannel::new(configured()).is_enabled());
    }

    #[test]
    fn test_build_subject() {
        let channel = EmailChannel::new(EmailConfig::default());
        assert_eq!(channel.build_subject(PriorityLevel::High), "[HIGH] SPECTRA Alert");
    }

    #[test]
    fn test_build_body_without_metadata() {
        assert_eq!(
            EmailChannel::build_body("Disk almost full", &Metadata::new()),
            "Disk almost full\n\n"
        );
    }

    #[test]
    fn test_build_body_with_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("service".into(), json!("billing"));
        metadata.insert("attempts".into(), json!(3));

        let body = EmailChannel::build_body("Job failed", &metadata);
        assert_eq!(body, "Job failed\n\nDetails:\n  attempts: 3\n  service: billing\n");
    }

    #[tokio::test]
    async fn test_send_requires_recipient() {
        let channel = EmailChannel::new(configured());
        let outcome = channel
            .send("Test", PriorityLevel::Normal, &Metadata::new(), None)
            .await;
        assert!(outcome.is_failed());
        assert!(outcome.error.unwrap().to_lowercase().contains("recipient required"));
    }

    #[tokio::test]
    async fn test_send_requires_recipient_even_when_disabled() {
        let channel = EmailChannel::new(EmailConfig::default());
        let outcome = channel
            .send("Test", PriorityLevel::Normal, &Metadata::new(), Some("  "))
            .await;
        assert_eq!(outcome.error.as_deref(), Some("Email recipient required"));
    }

    #[tokio::test]
    async fn test_send_not_configured() {
        let channel = EmailChannel::new(EmailConfig::default());
        let outcome = channel
            .send("Test", PriorityLevel::Normal, &Metadata::new(), Some("ops@example.com"))
            .await;
        assert_eq!(outcome.error.as_deref(), Some("Email channel not configured"));
    }

    #[tokio::test]
    async fn test_send_invalid_recipient_fails() {
        let channel = EmailChannel::new(configured());
        let outcome = channel
            .send("Test", PriorityLevel::Normal, &Metadata::new(), Some("not-an-email"))
            .await;
        assert!(outcome.is_failed());
        assert!(outcome.error.unwrap().starts_with("Email send failed"));
    }

    #[tokio::test]
    async fn test_send_transport_failure() {
        let channel = EmailChannel::new(configured());
        let outcome = channel
            .send("Test", PriorityLevel::Normal, &Metadata::new(), Some("ops@example.com"))
            .await;
        assert!(outcome.is_failed());
        assert!(outcome.error.unwrap().starts_with("Email send failed"));
    }

    #[tokio::test]
    async fn test_health_check_not_configured() {
        let health = EmailChannel::new(EmailConfig::default()).health_check().await;
        assert!(!health.healthy);
        assert_eq!(health.error.as_deref(), Some("SMTP credentials not configured"));
    }

    #[tokio::test]
    async fn test_username_without_password_opens_no_session() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let channel = EmailChannel::new(EmailConfig {
            smtp_port: listener.local_addr().unwrap().port(),
            smtp_password: None,
            ..configured()
        });
        assert!(channel.is_enabled());

        let health = channel.health_check().await;
        assert_eq!(health, ChannelHealth::unhealthy("SMTP password not configured"));

        let outcome = channel
            .send("Test", PriorityLevel::Normal, &Metadata::new(), Some("ops@example.com"))
            .await;
        assert_eq!(outcome, DeliveryOutcome::failed("SMTP password not configured"));

        let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "no SMTP connection should be opened");
    }

    #[tokio::test]
    async fn test_health_check_authenticates() {
        let (port, commands) = smtp_server_rejecting_auth().await;
        let channel = EmailChannel::new(EmailConfig {
            smtp_port: port,
            ..configured()
        });

        let health = channel.health_check().await;

        assert!(!health.healthy);
        assert!(health.error.unwrap().starts_with("SMTP connection failed"));
        let commands = commands.lock().unwrap();
        assert!(commands.iter().any(|c| c.starts_with("AUTH")), "{commands:?}");
        assert!(!commands.iter().any(|c| c == "NOOP"));
    }

    #[tokio::test]
    async fn test_health_check_connection_refused() {
        let health = EmailChannel::new(configured()).health_check().await;
        assert!(!health.healthy);
        assert!(health.error.unwrap().starts_with("SMTP connection failed"));
    }
}
