use thiserror::Error;

/// Failures surfaced by [`crate::selection::SelectionService`].
///
/// None of these tear the process down. Malformed selection events never show
/// up here: they are dropped by the resolver and logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolbarError {
    #[error("global selection hook is not available on this host")]
    CapabilityUnavailable,
    #[error("selection hook failed to start: {0}")]
    HookStartFailure(String),
    #[error("selection service is already running")]
    AlreadyRunning,
    #[error("selection service is not running")]
    NotRunning,
    #[error("native clipboard write failed")]
    ClipboardWriteFailure,
}
