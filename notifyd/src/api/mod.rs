//! REST API server module.
//!
//! Provides the HTTP endpoints for sending notifications, inspecting
//! channels and querying delivery history.

pub mod error;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod server;

pub use server::{ApiServer, ApiServerConfig, AppState};
