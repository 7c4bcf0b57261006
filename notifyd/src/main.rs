use anyhow::Context;
use notifyd::api::{ApiServer, ApiServerConfig, AppState};
use notifyd::config::Settings;
use notifyd::{database, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().context("Invalid configuration")?;
    logging::init_logging(&settings)?;

    tracing::info!(
        service = %settings.service_name,
        version = env!("CARGO_PKG_VERSION"),
        environment = %settings.environment,
        "Starting notification service"
    );
    tracing::info!(
        discord = settings.discord.enabled && settings.discord.webhook_url.is_some(),
        email = settings.email.enabled && settings.email.smtp_username.is_some(),
        teams = settings.teams.enabled,
        sms = settings.sms.enabled,
        stdout = settings.stdout.enabled,
        max_attempts = settings.retry.max_attempts(),
        retry_delay_secs = settings.retry.retry_delay_secs,
        max_retry_wait_secs = settings.retry.max_total_delay().as_secs(),
        "Channels configured"
    );

    // History is optional; a broken database only costs us history.
    let pool = match settings.database_url.as_deref() {
        Some(url) => match database::connect(url).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::warn!(error = %e, "Database unavailable, history disabled");
                None
            }
        },
        None => {
            tracing::info!("No database configured, history disabled");
            None
        }
    };

    let state = AppState::from_settings(&settings, pool);
    let server = ApiServer::new(ApiServerConfig::from_settings(&settings), state);

    let cancel_token = server.cancel_token();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        tracing::info!("Received Ctrl-C, shutting down");
        cancel_token.cancel();
    });

    server.run().await?;

    tracing::info!("Notification service stopped");
    Ok(())
}
