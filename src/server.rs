//! Portal HTTP Server
//!
//! Axum-based server with CORS for the browser shell, request tracing, and
//! graceful shutdown.

use crate::api::{auth_router, consoles_router, health_router, AppState};
use crate::auth::IdentityClient;
use crate::config::PortalConfig;
use axum::http::{header, Method};
use axum::Router;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Portal server
pub struct PortalServer {
    config: PortalConfig,
    state: Arc<AppState>,
}

impl PortalServer {
    /// Create a new portal server with the given configuration and identity
    /// client
    pub fn new(config: PortalConfig, identity: Arc<dyn IdentityClient>) -> Self {
        let state = Arc::new(AppState::new(&config, identity));
        Self { config, state }
    }

    /// Build the router with all routes and middleware
    fn build_router(&self) -> Router {
        // The shell and the embedded consoles are cross-origin; only the
        // configured shell origins may call the API.
        let cors = CorsLayer::new()
            .allow_origin(
                self.config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        let api = Router::new()
            .merge(health_router(self.state.clone()))
            .merge(consoles_router(self.state.clone()))
            .merge(auth_router(self.state.clone()));

        let mut router = Router::new().nest("/api", api).layer(cors);

        if self.config.log_requests {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server and run until shutdown signal
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr();
        let router = self.build_router();

        info!("Starting portal server on {}", addr);
        if !self.config.is_localhost() {
            warn!(
                "Portal bound to {} - ensure an authenticating proxy sits in front",
                addr
            );
        }
        info!("Portal API available at {}/api", self.config.base_url());

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Portal server shut down gracefully");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct StaticIdentity(bool);

    #[async_trait]
    impl IdentityClient for StaticIdentity {
        async fn is_authenticated(&self) -> Result<bool> {
            Ok(self.0)
        }

        async fn logout(&self) -> Result<()> {
            Ok(())
        }
    }

    fn test_router(authenticated: bool) -> Router {
        PortalServer::new(
            PortalConfig::default(),
            Arc::new(StaticIdentity(authenticated)),
        )
        .build_router()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_router(true)
            .oneshot(get("/api/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn test_consoles_start_idle() {
        let response = test_router(true)
            .oneshot(get("/api/consoles"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let consoles = json.as_array().unwrap();
        assert_eq!(consoles.len(), 5);
        for console in consoles {
            assert_eq!(console["session"]["loading_state"], "idle");
            assert_eq!(console["session"]["retry_count"], 0);
        }
    }

    #[tokio::test]
    async fn test_unknown_console_is_404() {
        let response = test_router(true)
            .oneshot(get("/api/consoles/billing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_frame_events_drive_session() {
        let router = test_router(true);

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/consoles/monitoring/events",
                r#"{"event":"loading"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["session"]["loading_state"], "loading");

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/consoles/monitoring/events",
                r#"{"event":"failed","kind":"network_error","message":"connection refused"}"#,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["session"]["loading_state"], "error");
        assert_eq!(json["session"]["error"]["kind"], "network_error");

        let response = router
            .clone()
            .oneshot(post_json("/api/consoles/monitoring/retry", ""))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["session"]["loading_state"], "loading");
        assert_eq!(json["session"]["retry_count"], 1);

        let response = router
            .oneshot(post_json(
                "/api/consoles/monitoring/events",
                r#"{"event":"loaded"}"#,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["session"]["loading_state"], "loaded");
        assert_eq!(json["session"]["retry_count"], 1);
    }

    #[tokio::test]
    async fn test_intent_requires_absolute_path() {
        let response = test_router(true)
            .oneshot(post_json(
                "/api/auth/intent",
                r#"{"path":"https://evil.example/"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_restores_intended_route() {
        let router = test_router(true);

        let response = router
            .clone()
            .oneshot(post_json("/api/auth/intent", r#"{"path":"/settings"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(post_json("/api/auth/complete", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["destination"], "/settings");
        assert!(json.get("error").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_times_out_to_default() {
        let response = test_router(false)
            .oneshot(post_json("/api/auth/complete", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["destination"], "/home");
        assert_eq!(json["error"]["kind"], "timeout_error");
    }
}
