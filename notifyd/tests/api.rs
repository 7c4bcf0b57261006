//! HTTP API tests driven through the router without a listener.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use notifyd::api::{ApiServer, ApiServerConfig, AppState};
use notifyd::config::{Secret, Settings};
use notifyd::database;
use notifyd::domain::RetryPolicy;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_settings() -> Settings {
    Settings {
        retry: RetryPolicy::new(0, 0),
        probe_timeout_secs: 2,
        ..Settings::default()
    }
}

fn router_for(settings: &Settings, pool: Option<database::DbPool>) -> Router {
    let state = AppState::from_settings(settings, pool);
    ApiServer::new(ApiServerConfig::from_settings(settings), state).build_router()
}

async fn router_with_db(settings: &Settings) -> Router {
    let pool = database::init_pool_with_size("sqlite::memory:", 1)
        .await
        .unwrap();
    database::run_migrations(&pool).await.unwrap();
    router_for(settings, Some(pool))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

#[tokio::test]
async fn test_root() {
    let router = router_for(&test_settings(), None);
    let (status, body) = get(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "notifications");
    assert_eq!(body["status"], "operational");
    assert_eq!(body["documentation"], "/docs");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness() {
    let router = router_for(&test_settings(), None);
    let (status, body) = get(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "notifications");
}

#[tokio::test]
async fn test_notify_stdout_delivers() {
    let router = router_for(&test_settings(), None);
    let (status, body) = post_json(
        &router,
        "/v1/notify",
        json!({
            "channel": "stdout",
            "message": "Test notification",
            "priority": "normal",
            "metadata": {"test": "true"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["channel"], "stdout");
    assert!(body["error"].is_null());
    assert!(body["notification_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["sent_at"].is_string());
}

#[tokio::test]
async fn test_notify_unconfigured_channel_is_failed_not_error() {
    let router = router_for(&test_settings(), None);
    let (status, body) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "discord", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Discord channel not configured");
}

#[tokio::test]
async fn test_notify_unregistered_channel() {
    let router = router_for(&test_settings(), None);
    let (status, body) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "teams", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Channel teams not supported");
}

#[tokio::test]
async fn test_notify_email_requires_recipient() {
    let router = router_for(&test_settings(), None);
    let (status, body) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "email", "message": "hello", "priority": "high"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Email recipient required");
}

#[tokio::test]
async fn test_notify_rejects_invalid_requests() {
    let router = router_for(&test_settings(), None);

    let cases = [
        json!({"channel": "invalid_channel", "message": "Test"}),
        json!({"channel": "stdout", "message": "Test", "priority": "urgent"}),
        json!({"channel": "stdout"}),
        json!({"message": "Test"}),
        json!({"channel": "stdout", "message": ""}),
        json!({"channel": "stdout", "message": "x".repeat(4097)}),
    ];

    for case in cases {
        let (status, _) = post_json(&router, "/v1/notify", case.clone()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{case}");
    }
}

#[tokio::test]
async fn test_notify_accepts_max_length_message() {
    let router = router_for(&test_settings(), None);
    let (status, body) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "stdout", "message": "x".repeat(4096)}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delivered");
}

#[tokio::test]
async fn test_notify_discord_retries_against_failing_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .expect(4)
        .mount(&server)
        .await;

    let mut settings = test_settings();
    settings.retry = RetryPolicy::new(3, 0);
    settings.discord.webhook_url = Some(Secret::new(server.uri()));
    let router = router_for(&settings, None);

    let (status, body) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "discord", "message": "deploy failed", "priority": "high"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("400"));
    server.verify().await;
}

#[tokio::test]
async fn test_channels_lists_registered_channels() {
    let router = router_for(&test_settings(), None);
    let (status, body) = get(&router, "/v1/channels").await;

    assert_eq!(status, StatusCode::OK);
    let channels = body["channels"].as_array().unwrap();
    let names: Vec<_> = channels.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["discord", "email", "stdout"]);

    let discord = &channels[0];
    assert_eq!(discord["enabled"], false);
    assert_eq!(discord["configured"], false);
    assert_eq!(discord["status"], "unhealthy");
    assert_eq!(discord["error"], "Discord webhook URL not configured");

    let stdout = &channels[2];
    assert_eq!(stdout["enabled"], true);
    assert_eq!(stdout["status"], "healthy");
    assert!(stdout["error"].is_null());
}

#[tokio::test]
async fn test_channels_reports_healthy_discord() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut settings = test_settings();
    settings.discord.webhook_url = Some(Secret::new(server.uri()));
    let router = router_for(&settings, None);

    let (_, body) = get(&router, "/v1/channels").await;
    let discord = &body["channels"][0];
    assert_eq!(discord["enabled"], true);
    assert_eq!(discord["status"], "healthy");
}

#[tokio::test]
async fn test_v1_health_reports_every_channel() {
    let router = router_for(&test_settings(), None);
    let (status, body) = get(&router, "/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "notifications");
    assert!(body["timestamp"].is_string());
    assert_eq!(
        body["channels"],
        json!({"discord": "unhealthy", "email": "unhealthy", "stdout": "healthy"})
    );
}

#[tokio::test]
async fn test_history_without_database() {
    let router = router_for(&test_settings(), None);
    let (status, body) = get(&router, "/v1/history").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_history_records_dispatches() {
    let router = router_with_db(&test_settings()).await;

    let (_, first) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "stdout", "message": "one", "metadata": {"service": "billing"}}),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let (_, second) = post_json(
        &router,
        "/v1/notify",
        json!({"channel": "discord", "message": "two", "priority": "critical"}),
    )
    .await;

    let (status, body) = get(&router, "/v1/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);

    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications[0]["id"], second["notification_id"]);
    assert_eq!(notifications[0]["status"], "failed");
    assert_eq!(notifications[0]["priority"], "critical");
    assert_eq!(notifications[0]["error"], "Discord channel not configured");
    assert_eq!(notifications[1]["id"], first["notification_id"]);
    assert_eq!(notifications[1]["metadata"]["service"], "billing");

    let (_, filtered) = get(&router, "/v1/history?service=billing&channel=stdout").await;
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["notifications"][0]["message"], "one");

    let (_, paged) = get(&router, "/v1/history?limit=1&offset=1").await;
    assert_eq!(paged["total"], 2);
    assert_eq!(paged["notifications"].as_array().unwrap().len(), 1);
    assert_eq!(paged["notifications"][0]["message"], "one");
}

#[tokio::test]
async fn test_history_rejects_bad_paging() {
    let router = router_with_db(&test_settings()).await;

    for uri in [
        "/v1/history?limit=0",
        "/v1/history?limit=1001",
        "/v1/history?offset=-1",
        "/v1/history?limit=abc",
        "/v1/history?channel=pager",
    ] {
        let (status, _) = get(&router, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let router = router_for(&test_settings(), None);
    let (status, body) = get(&router, "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Notifications Service");
    assert!(body["paths"]["/v1/notify"]["post"].is_object());
}
