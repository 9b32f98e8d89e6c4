//! Console Session Integration Tests
//!
//! Drives the documented load/retry lifecycle through the public API.

use opsportal::{ConsoleKind, ConsoleRegistry, ErrorKind, FrameEvent, LoadingState, PortalConfig};

fn failed(kind: ErrorKind, message: &str) -> FrameEvent {
    FrameEvent::Failed {
        kind,
        message: message.to_string(),
        details: None,
    }
}

#[test]
fn test_load_error_retry_load_lifecycle() {
    let registry = ConsoleRegistry::new(&PortalConfig::default());
    let console = ConsoleKind::DatabaseAdmin;

    // View activates
    let state = registry.apply(console, FrameEvent::Loading);
    assert_eq!(state.loading_state, LoadingState::Loading);
    assert!(state.error.is_none());

    // First attempt fails
    let state = registry.apply(console, failed(ErrorKind::NetworkError, "failed"));
    assert_eq!(state.loading_state, LoadingState::Error);
    let error = state.error.expect("error record present in ERROR state");
    assert_eq!(error.kind, ErrorKind::NetworkError);
    assert_eq!(error.message, "failed");
    assert_eq!(state.retry_count, 0);

    // User retries, this time the document loads
    let state = registry.retry(console);
    assert_eq!(state.loading_state, LoadingState::Loading);
    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 1);

    let state = registry.apply(console, FrameEvent::Loaded);
    assert_eq!(state.loading_state, LoadingState::Loaded);
    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 1);
}

#[test]
fn test_error_invariant_holds_across_every_transition() {
    let registry = ConsoleRegistry::new(&PortalConfig::default());
    let console = ConsoleKind::Monitoring;

    let events = [
        FrameEvent::Loading,
        failed(ErrorKind::FrameError, "render failed"),
        FrameEvent::Loading,
        FrameEvent::Loaded,
        failed(ErrorKind::TimeoutError, "timed out"),
        FrameEvent::Loaded,
    ];

    for event in events {
        let state = registry.apply(console, event);
        assert_eq!(
            state.error.is_some(),
            state.loading_state == LoadingState::Error
        );
    }
}

#[test]
fn test_one_console_failing_leaves_the_others_alone() {
    let registry = ConsoleRegistry::new(&PortalConfig::default());

    registry.apply(ConsoleKind::ObjectStorage, FrameEvent::Loading);
    registry.apply(
        ConsoleKind::ObjectStorage,
        failed(ErrorKind::NetworkError, "connection refused"),
    );

    for (kind, state) in registry.snapshots() {
        if kind == ConsoleKind::ObjectStorage {
            assert_eq!(state.loading_state, LoadingState::Error);
        } else {
            assert_eq!(state.loading_state, LoadingState::Idle);
            assert!(state.error.is_none());
        }
    }
}

#[test]
fn test_reset_reclaims_a_failed_console() {
    let registry = ConsoleRegistry::new(&PortalConfig::default());
    let console = ConsoleKind::IdentityAdmin;
    let original_url = registry.snapshot(console).url.clone();

    registry.apply(console, failed(ErrorKind::UnknownError, "boom"));
    registry.retry(console);
    registry.retry(console);

    let state = registry.reset(console);
    assert_eq!(state.loading_state, LoadingState::Idle);
    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 0);
    assert_eq!(state.url, original_url);
}
