//! Authentication Completion API
//!
//! Two endpoints complete the SSO round trip: the shell records the user's
//! intended destination before redirecting to the identity provider, then
//! calls back here after the redirect lands to wait out the completion poll.

use super::{ApiError, AppState};
use crate::auth::{AuthCompletionPoller, Navigator};
use crate::session::SessionError;
use anyhow::Result;
use async_trait::async_trait;
use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The browser shell owns the real navigation; the chosen path travels back
/// in the completion response.
struct ShellNavigator;

#[async_trait]
impl Navigator for ShellNavigator {
    async fn navigate(&self, path: &str) -> Result<()> {
        debug!("Navigation delegated to shell: {}", path);
        Ok(())
    }
}

/// Intent request: where the user was headed
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub path: String,
}

/// Intent response
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub stored: bool,
}

/// Completion response: where the shell should navigate, and why the flow
/// failed if it did
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
}

/// Record the intended route before the login redirect
pub async fn post_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IntentRequest>,
) -> Result<Json<IntentResponse>, ApiError> {
    if !req.path.starts_with('/') {
        return Err(ApiError::InvalidPath(req.path));
    }
    state.routes.set(req.path);
    Ok(Json(IntentResponse { stored: true }))
}

/// Run the completion poller to its terminal state
///
/// The response arrives after at most the attempt ceiling plus the fallback
/// delay; the shell shows its pending state until then.
pub async fn post_complete(State(state): State<Arc<AppState>>) -> Json<CompleteResponse> {
    let poller = AuthCompletionPoller::new(
        state.identity.clone(),
        Arc::new(ShellNavigator),
        state.routes.clone(),
        state.default_destination.clone(),
    );

    let outcome = poller.run().await;
    Json(CompleteResponse {
        destination: outcome.destination,
        error: outcome.error,
    })
}

/// Create the authentication completion router
pub fn auth_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/intent", post(post_intent))
        .route("/auth/complete", post(post_complete))
        .with_state(state)
}
