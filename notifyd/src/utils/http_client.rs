use std::sync::OnceLock;

use tracing::debug;

/// Install the process-wide rustls crypto provider.
///
/// reqwest is built without a bundled provider, so this must run before the
/// first HTTPS request. Safe to call repeatedly.
pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Another crate got there first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Shared HTTP client for webhook channels.
///
/// Timeouts are applied per request by the caller since send and probe use
/// different budgets.
pub fn build_client() -> reqwest::Client {
    install_rustls_provider();
    reqwest::Client::builder()
        .user_agent(concat!("notifyd/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(%error, "Failed to build HTTP client; falling back to reqwest defaults");
            reqwest::Client::new()
        })
}
