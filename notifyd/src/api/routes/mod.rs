//! API route modules.

pub mod channels;
pub mod health;
pub mod history;
pub mod notify;
pub mod root;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;
use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(notify::router())
        .merge(channels::router())
        .merge(history::router())
        .merge(health::v1_router());

    Router::new()
        .merge(root::router())
        .merge(health::router())
        .nest("/v1", v1)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}
