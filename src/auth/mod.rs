//! Single-Sign-On Completion
//!
//! After the identity provider redirects back into the portal, the browser
//! shell has no push signal telling it when authentication has actually
//! landed. This module owns the browser-side completion of that round trip:
//! the seams to the external identity client and navigation service, the
//! single-slot store remembering where the user was headed, and the bounded
//! poller that ties them together.

pub mod identity;
pub mod poller;

pub use identity::HttpIdentityClient;
pub use poller::{
    AuthCompletionPoller, AuthOutcome, FALLBACK_REDIRECT_DELAY, MAX_POLL_ATTEMPTS, POLL_INTERVAL,
};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

/// External identity client
///
/// The authenticated flag is the sole source of truth for whether the login
/// round trip has completed; no credential handling happens on this side of
/// the seam.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Has the identity provider's redirect completed authentication?
    async fn is_authenticated(&self) -> Result<bool>;

    /// Drop the identity session. Called best-effort on the failure path so
    /// a half-open session cannot bounce the user back into the redirect.
    async fn logout(&self) -> Result<()>;
}

/// Navigation service seam
///
/// The browser shell performs the actual navigation; implementations
/// deliver the chosen path to it.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, path: &str) -> Result<()>;
}

/// Single pending-navigation slot
///
/// Written once by the login-initiation path before the redirect, consumed
/// exactly once by the poller on success. There is only ever one reader, so
/// the mutexed read-then-clear in [`take`](Self::take) is the whole
/// atomicity story.
#[derive(Debug, Default)]
pub struct IntendedRouteStore {
    slot: Mutex<Option<String>>,
}

impl IntendedRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember where the user was headed before the login redirect
    pub fn set(&self, path: impl Into<String>) {
        *self.slot.lock() = Some(path.into());
    }

    /// Get-and-clear the pending destination
    pub fn take(&self) -> Option<String> {
        self.slot.lock().take()
    }

    /// Discard any pending destination
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
