//! Clipboard writes for the toolbar's copy action.
//!
//! The native selection hook gets the first try because it can write while
//! another process holds the clipboard. When it refuses, the generic
//! `arboard` backend takes over.

use crate::error::ToolbarError;
use crate::selection::SelectionService;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
    #[error(transparent)]
    Service(#[from] ToolbarError),
}

/// Put `text` on the system clipboard through `arboard`.
pub fn set(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_owned())?;
    Ok(())
}

/// Write through the running service's hook, falling back to [`set`].
///
/// A stopped service is reported as an error; the fallback only covers a
/// hook that is running but failed the write.
pub fn write_with_fallback(service: &SelectionService, text: &str) -> Result<(), ClipboardError> {
    match service.write_to_clipboard(text) {
        Ok(()) => Ok(()),
        Err(ToolbarError::ClipboardWriteFailure) => {
            tracing::info!("falling back to generic clipboard backend");
            set(text)
        }
        Err(err) => Err(err.into()),
    }
}
