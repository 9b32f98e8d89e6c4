//! Console Session API
//!
//! The frame shell reads session snapshots here and forwards the native
//! load/error signals of each embedded document. All state transitions go
//! through the registry; handlers never touch a controller directly.

use super::{ApiError, AppState};
use crate::console::{ConsoleKind, FrameEvent};
use crate::session::{ErrorKind, SessionState};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One console as published to the shell
#[derive(Debug, Serialize)]
pub struct ConsoleSummary {
    pub id: ConsoleKind,
    pub label: &'static str,
    pub session: SessionState,
}

impl ConsoleSummary {
    fn new(kind: ConsoleKind, session: SessionState) -> Self {
        Self {
            id: kind,
            label: kind.label(),
            session,
        }
    }
}

/// Frame-shell signal body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum FrameEventBody {
    Loading,
    Loaded,
    Failed {
        kind: Option<ErrorKind>,
        message: Option<String>,
        details: Option<String>,
    },
}

impl FrameEventBody {
    /// An unclassified native error signal counts as a frame error
    fn into_event(self, console: ConsoleKind) -> FrameEvent {
        match self {
            Self::Loading => FrameEvent::Loading,
            Self::Loaded => FrameEvent::Loaded,
            Self::Failed {
                kind,
                message,
                details,
            } => FrameEvent::Failed {
                kind: kind.unwrap_or(ErrorKind::FrameError),
                message: message
                    .unwrap_or_else(|| format!("{} console failed to load", console.label())),
                details,
            },
        }
    }
}

fn parse_kind(id: &str) -> Result<ConsoleKind, ApiError> {
    ConsoleKind::parse(id).ok_or_else(|| ApiError::UnknownConsole(id.to_string()))
}

/// List all consoles with their current sessions
pub async fn list_consoles(State(state): State<Arc<AppState>>) -> Json<Vec<ConsoleSummary>> {
    let consoles = state
        .registry
        .snapshots()
        .into_iter()
        .map(|(kind, session)| ConsoleSummary::new(kind, session))
        .collect();
    Json(consoles)
}

/// Get one console's session snapshot
pub async fn get_console(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConsoleSummary>, ApiError> {
    let kind = parse_kind(&id)?;
    Ok(Json(ConsoleSummary::new(kind, state.registry.snapshot(kind))))
}

/// Ingest a frame signal for one console
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<FrameEventBody>,
) -> Result<Json<ConsoleSummary>, ApiError> {
    let kind = parse_kind(&id)?;
    let session = state.registry.apply(kind, body.into_event(kind));
    Ok(Json(ConsoleSummary::new(kind, session)))
}

/// User-initiated retry
pub async fn post_retry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConsoleSummary>, ApiError> {
    let kind = parse_kind(&id)?;
    Ok(Json(ConsoleSummary::new(kind, state.registry.retry(kind))))
}

/// View reactivation
pub async fn post_reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConsoleSummary>, ApiError> {
    let kind = parse_kind(&id)?;
    Ok(Json(ConsoleSummary::new(kind, state.registry.reset(kind))))
}

/// Create the console session router
pub fn consoles_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/consoles", get(list_consoles))
        .route("/consoles/{id}", get(get_console))
        .route("/consoles/{id}/events", post(post_event))
        .route("/consoles/{id}/retry", post(post_retry))
        .route("/consoles/{id}/reset", post(post_reset))
        .with_state(state)
}
