//! Console Catalog and Session Registry
//!
//! The portal embeds five externally operated consoles. Each one gets its
//! own [`SessionController`]; the registry translates frame-shell signals
//! into controller operations. Consoles are fully independent - there is no
//! ordering relationship between controllers.

use crate::config::PortalConfig;
use crate::session::{ErrorKind, SessionController, SessionState};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five embedded consoles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleKind {
    Monitoring,
    ObjectStorage,
    DatabaseAdmin,
    Tracing,
    IdentityAdmin,
}

impl ConsoleKind {
    pub const ALL: [ConsoleKind; 5] = [
        ConsoleKind::Monitoring,
        ConsoleKind::ObjectStorage,
        ConsoleKind::DatabaseAdmin,
        ConsoleKind::Tracing,
        ConsoleKind::IdentityAdmin,
    ];

    /// Stable identifier used in routes and config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monitoring => "monitoring",
            Self::ObjectStorage => "object-storage",
            Self::DatabaseAdmin => "database-admin",
            Self::Tracing => "tracing",
            Self::IdentityAdmin => "identity-admin",
        }
    }

    /// Human label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monitoring => "Monitoring",
            Self::ObjectStorage => "Object Storage",
            Self::DatabaseAdmin => "Database Admin",
            Self::Tracing => "Tracing",
            Self::IdentityAdmin => "Identity Admin",
        }
    }

    /// Parse a stable identifier back into a kind
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == id)
    }
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal forwarded from the frame shell into a console's controller
///
/// The embedded documents are opaque cross-origin frames; the shell only
/// sees the native load/error signals and forwards them here.
#[derive(Debug, Clone)]
pub enum FrameEvent {
    /// View activated or a load re-attempted; the frame is mounting
    Loading,
    /// Native load signal from the embedded document
    Loaded,
    /// Native error signal, classified by the shell
    Failed {
        kind: ErrorKind,
        message: String,
        details: Option<String>,
    },
}

/// One session controller per embedded console
///
/// Each controller sits behind its own lock so consoles stay independent;
/// locking one console never blocks another.
pub struct ConsoleRegistry {
    entries: Vec<(ConsoleKind, Mutex<SessionController>)>,
}

impl ConsoleRegistry {
    /// Build controllers for all five consoles from the deployment config
    pub fn new(config: &PortalConfig) -> Self {
        let entries = ConsoleKind::ALL
            .into_iter()
            .map(|kind| {
                let controller = SessionController::new(kind.label(), config.console_url(kind));
                (kind, Mutex::new(controller))
            })
            .collect();
        Self { entries }
    }

    fn entry(&self, kind: ConsoleKind) -> &Mutex<SessionController> {
        // ALL covers every variant, so the lookup cannot miss
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, ctl)| ctl)
            .expect("registry holds every console kind")
    }

    /// Apply a frame-shell signal to one console
    pub fn apply(&self, kind: ConsoleKind, event: FrameEvent) -> SessionState {
        let mut ctl = self.entry(kind).lock();
        match event {
            FrameEvent::Loading => ctl.set_loading(),
            FrameEvent::Loaded => ctl.set_loaded(),
            FrameEvent::Failed {
                kind: error_kind,
                message,
                details,
            } => ctl.set_error(error_kind, message, details),
        }
        ctl.snapshot()
    }

    /// User-initiated retry: count it, then start loading again
    pub fn retry(&self, kind: ConsoleKind) -> SessionState {
        let mut ctl = self.entry(kind).lock();
        ctl.increment_retry_count();
        ctl.set_loading();
        ctl.snapshot()
    }

    /// View reactivation: back to the initial state
    pub fn reset(&self, kind: ConsoleKind) -> SessionState {
        let mut ctl = self.entry(kind).lock();
        ctl.reset();
        ctl.snapshot()
    }

    /// Read-only snapshot of one console
    pub fn snapshot(&self, kind: ConsoleKind) -> SessionState {
        self.entry(kind).lock().snapshot()
    }

    /// Read-only snapshots of all consoles, in catalog order
    pub fn snapshots(&self) -> Vec<(ConsoleKind, SessionState)> {
        self.entries
            .iter()
            .map(|(kind, ctl)| (*kind, ctl.lock().snapshot()))
            .collect()
    }
}
