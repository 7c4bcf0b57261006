//! notifyd library crate.
//!
//! Multi-channel notification dispatch: channels, registry, retrying
//! dispatcher, health probing, history storage and the HTTP API.

pub mod api;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod logging;
pub mod notification;
pub mod utils;

pub use error::{Error, Result};
