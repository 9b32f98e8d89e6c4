//! opsportal
//!
//! Backend core for an operations portal that embeds five independently
//! operated web consoles and completes the browser side of a single-sign-on
//! redirect flow.
//!
//! # Features
//!
//! - **Session tracking**: one loading/error/retry state machine per
//!   embedded console, published as read-only snapshots
//! - **Console catalog**: monitoring, object storage, database admin,
//!   tracing, and identity admin consoles with deployment-fixed URLs
//! - **SSO completion**: bounded polling of the identity client after the
//!   provider redirect, with intended-route restore and a safe fallback
//! - **Portal API**: JSON surface for the browser shell (snapshots, frame
//!   signals, retry/reset, login intent, completion)
//!
//! # Architecture
//!
//! ```text
//! Browser shell ──► Portal API ──► ConsoleRegistry ──► SessionController (×5)
//!                       │
//!                       └── AuthCompletionPoller ──► IdentityClient (HTTP)
//!                                   │
//!                                   └── IntendedRouteStore
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod server;
pub mod session;

pub use auth::{
    AuthCompletionPoller, AuthOutcome, HttpIdentityClient, IdentityClient, IntendedRouteStore,
    Navigator, FALLBACK_REDIRECT_DELAY, MAX_POLL_ATTEMPTS, POLL_INTERVAL,
};
pub use config::PortalConfig;
pub use console::{ConsoleKind, ConsoleRegistry, FrameEvent};
pub use server::PortalServer;
pub use session::{ErrorKind, LoadingState, SessionController, SessionError, SessionState};
