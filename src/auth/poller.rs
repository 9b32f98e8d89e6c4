//! Authentication Completion Poller
//!
//! The identity client's authenticated signal flips asynchronously after the
//! provider redirect, with no push notification available at this layer, so
//! the poller checks the flag on a fixed tick with a hard attempt ceiling.
//! On success it consumes the intended route and navigates there; if the
//! redirect never completes, the bounded loop guarantees the user is not
//! left hanging - the failure is surfaced, then a delayed fallback redirect
//! sends them to the default destination.
//!
//! One activation per login attempt: `run` consumes the poller, and a fresh
//! login re-triggers the whole redirect flow with a new one. Dropping the
//! returned future (view teardown) cancels everything, including any
//! pending fallback navigation.

use crate::auth::{IdentityClient, IntendedRouteStore, Navigator};
use crate::session::{ErrorKind, SessionError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time between authentication checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Checks before giving up (10 seconds at `POLL_INTERVAL`)
pub const MAX_POLL_ATTEMPTS: u32 = 20;

/// How long the failure message stays visible before the fallback redirect
pub const FALLBACK_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Terminal result of one poller activation
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// Where the user was sent
    pub destination: String,
    /// Present when the flow ended on the failure path
    pub error: Option<SessionError>,
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Waits for the login round trip to land, then restores the user's
/// intended destination
pub struct AuthCompletionPoller {
    identity: Arc<dyn IdentityClient>,
    navigator: Arc<dyn Navigator>,
    routes: Arc<IntendedRouteStore>,
    default_destination: String,
}

impl AuthCompletionPoller {
    pub fn new(
        identity: Arc<dyn IdentityClient>,
        navigator: Arc<dyn Navigator>,
        routes: Arc<IntendedRouteStore>,
        default_destination: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            navigator,
            routes,
            default_destination: default_destination.into(),
        }
    }

    /// Run the completion flow until it terminates
    ///
    /// Checks are strictly sequential: one suspension per tick, never an
    /// overlapping check in flight.
    pub async fn run(self) -> AuthOutcome {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            match self.identity.is_authenticated().await {
                Ok(true) => {
                    debug!("Authentication confirmed on check {}", attempt);
                    return self.complete().await;
                }
                Ok(false) => {
                    debug!("Authentication pending ({}/{})", attempt, MAX_POLL_ATTEMPTS);
                }
                Err(e) => {
                    return self
                        .fail(
                            ErrorKind::UnknownError,
                            format!("Authentication check failed: {}", e),
                        )
                        .await;
                }
            }
        }

        self.fail(
            ErrorKind::TimeoutError,
            "Authentication did not complete in time".to_string(),
        )
        .await
    }

    async fn complete(self) -> AuthOutcome {
        let destination = self
            .routes
            .take()
            .unwrap_or_else(|| self.default_destination.clone());

        info!("Login complete, returning to '{}'", destination);
        if let Err(e) = self.navigator.navigate(&destination).await {
            warn!("Navigation to '{}' failed: {}", destination, e);
        }

        AuthOutcome {
            destination,
            error: None,
        }
    }

    async fn fail(self, kind: ErrorKind, message: String) -> AuthOutcome {
        warn!("Login did not complete: {}", message);

        // A half-open identity session here would bounce the user straight
        // back into the login redirect; clearing it is best-effort.
        if let Err(e) = self.identity.logout().await {
            warn!("Failed to clear identity session: {}", e);
        }

        // Hold the failure message before forcing the redirect
        tokio::time::sleep(FALLBACK_REDIRECT_DELAY).await;

        let destination = self.default_destination.clone();
        if let Err(e) = self.navigator.navigate(&destination).await {
            warn!("Fallback navigation to '{}' failed: {}", destination, e);
        }

        AuthOutcome {
            destination,
            error: Some(SessionError::new(kind, message)),
        }
    }
}
