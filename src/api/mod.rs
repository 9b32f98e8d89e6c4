//! Portal API Endpoints
//!
//! JSON API consumed by the browser shell: console session snapshots,
//! frame-signal ingestion, and SSO completion.

pub mod auth;
pub mod consoles;
pub mod health;

pub use auth::auth_router;
pub use consoles::consoles_router;
pub use health::health_router;

use crate::auth::{IdentityClient, IntendedRouteStore};
use crate::config::PortalConfig;
use crate::console::ConsoleRegistry;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Application state shared across handlers
pub struct AppState {
    /// One session controller per embedded console
    pub registry: ConsoleRegistry,
    /// Pending-navigation slot for the SSO round trip
    pub routes: Arc<IntendedRouteStore>,
    /// External identity client
    pub identity: Arc<dyn IdentityClient>,
    /// Fallback destination when no intended route is stored
    pub default_destination: String,
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Application version
    pub version: &'static str,
}

impl AppState {
    pub fn new(config: &PortalConfig, identity: Arc<dyn IdentityClient>) -> Self {
        Self {
            registry: ConsoleRegistry::new(config),
            routes: Arc::new(IntendedRouteStore::new()),
            identity,
            default_destination: config.default_destination.clone(),
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Errors surfaced to the shell
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown console: {0}")]
    UnknownConsole(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownConsole(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
