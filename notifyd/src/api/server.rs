//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Request;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::routes;
use crate::config::Settings;
use crate::database::DbPool;
use crate::database::repositories::SqlxNotificationHistoryRepository;
use crate::error::{Error, Result};
use crate::notification::{ChannelRegistry, Dispatcher, HealthProber, NotificationService};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

impl ApiServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bind_address: settings.host.clone(),
            port: settings.port,
            ..Self::default()
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Reported as `service` by the info and health endpoints.
    pub service_name: String,
    pub notification_service: Arc<NotificationService>,
    pub health_prober: Arc<HealthProber>,
}

impl AppState {
    pub fn new(
        service_name: impl Into<String>,
        notification_service: Arc<NotificationService>,
        health_prober: Arc<HealthProber>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            notification_service,
            health_prober,
        }
    }

    /// Wire the registry, dispatcher, prober and optional history store.
    pub fn from_settings(settings: &Settings, pool: Option<DbPool>) -> Self {
        let registry = Arc::new(ChannelRegistry::from_settings(settings));
        let dispatcher = Dispatcher::new(registry.clone(), settings.retry.clone());

        let mut service = NotificationService::new(dispatcher);
        if let Some(pool) = pool {
            service = service.with_history(Arc::new(SqlxNotificationHistoryRepository::new(pool)));
        }

        let prober = HealthProber::new(registry, settings.probe_timeout());

        Self::new(
            settings.service_name.clone(),
            Arc::new(service),
            Arc::new(prober),
        )
    }
}

/// Paths polled by orchestrators; kept out of request spans.
fn is_health_path(path: &str) -> bool {
    path == "/health" || path == "/v1/health"
}

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Build the router with all middleware.
    pub fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    if is_health_path(req.uri().path()) {
                        Span::none()
                    } else {
                        let mut make_span =
                            tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO);
                        use tower_http::trace::MakeSpan;
                        make_span.make_span(req)
                    }
                })
                .on_request(|req: &Request, span: &Span| {
                    if span.is_disabled() || is_health_path(req.uri().path()) {
                        return;
                    }
                    let mut on_request =
                        tower_http::trace::DefaultOnRequest::new().level(tracing::Level::INFO);
                    use tower_http::trace::OnRequest;
                    on_request.on_request(req, span);
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        let on_response =
                            tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO);
                        use tower_http::trace::OnResponse;
                        on_response.on_response(res, latency, span);
                    },
                ),
        )
    }

    /// Start the server and run until the cancel token fires.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| Error::Api(format!("Invalid address: {}", e)))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(|e| Error::Api(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
