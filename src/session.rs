//! Embedded Console Session Tracking
//!
//! Every embedded console shares the same loading lifecycle: idle until its
//! view activates, loading while the framed document fetches, then loaded or
//! errored. `SessionController` owns that state for exactly one console and
//! records failures reported to it by the frame shell; it performs no I/O
//! and never schedules retries itself (retries are user-triggered).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Loading lifecycle of one embedded console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    /// View not yet activated
    Idle,
    /// Frame mounted, embedded document still fetching
    Loading,
    /// Embedded document reported a successful load
    Loaded,
    /// Load failed; details live in the error record
    Error,
}

/// Why a console failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkError,
    TimeoutError,
    /// The embedded document failed to render
    FrameError,
    UnknownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::TimeoutError => "timeout_error",
            Self::FrameError => "frame_error",
            Self::UnknownError => "unknown_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded load failure
///
/// Created only by a transition into [`LoadingState::Error`]. Immutable once
/// created; the next failure supersedes it with a fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SessionError {
    /// Create an error record stamped with the current time
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            occurred_at: Utc::now(),
            details: None,
        }
    }

}

/// Read-only snapshot of one console session
///
/// Invariant: `error` is present if and only if `loading_state` is
/// [`LoadingState::Error`]. `url` is fixed at controller construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub loading_state: LoadingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
    pub url: String,
    pub retry_count: u32,
}

/// Owns the loading lifecycle of one embedded console
///
/// Single-writer: at most one mutation is in flight at any time (the caller
/// serializes access). There is no queueing or coalescing of transitions;
/// operations apply in call order.
pub struct SessionController {
    label: &'static str,
    state: SessionState,
}

impl SessionController {
    /// Create a controller in the initial state for a console at a fixed URL
    pub fn new(label: &'static str, url: impl Into<String>) -> Self {
        Self {
            label,
            state: SessionState {
                loading_state: LoadingState::Idle,
                error: None,
                url: url.into(),
                retry_count: 0,
            },
        }
    }

    /// Console label used in messages
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Current state (borrowed)
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current state (owned clone for publishing)
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    /// Transition to LOADING and clear any recorded error
    ///
    /// Idempotent while already loading.
    pub fn set_loading(&mut self) {
        self.state.error = None;
        self.transition(LoadingState::Loading);
    }

    /// Transition to LOADED and clear any recorded error
    ///
    /// Valid from any prior state; from ERROR this represents a successful
    /// retry.
    pub fn set_loaded(&mut self) {
        self.state.error = None;
        self.transition(LoadingState::Loaded);
    }

    /// Record a load failure and transition to ERROR
    ///
    /// Leaves `retry_count` untouched.
    pub fn set_error(&mut self, kind: ErrorKind, message: impl Into<String>, details: Option<String>) {
        let mut error = SessionError::new(kind, message);
        error.details = details;
        debug!("Console '{}' failed to load: {} ({})", self.label, error.message, error.kind);
        self.state.error = Some(error);
        self.transition(LoadingState::Error);
    }

    /// Count one user-initiated retry
    ///
    /// The caller invokes this once per retry gesture, before re-attempting
    /// the load. Does not change the loading state.
    pub fn increment_retry_count(&mut self) {
        self.state.retry_count += 1;
    }

    /// Return to the initial state, keeping the configured URL
    ///
    /// Used when the hosting view is reactivated.
    pub fn reset(&mut self) {
        self.state.error = None;
        self.state.retry_count = 0;
        self.transition(LoadingState::Idle);
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading_state == LoadingState::Loading
    }

    pub fn has_error(&self) -> bool {
        self.state.error.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.loading_state == LoadingState::Loaded
    }

    fn transition(&mut self, next: LoadingState) {
        let prev = self.state.loading_state;
        self.state.loading_state = next;
        if prev != next {
            debug!("Console '{}': {:?} -> {:?}", self.label, prev, next);
        }
    }
}
