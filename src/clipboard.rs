//! Copying replies to the system clipboard with `arboard`.
//!
//! A fresh [`arboard::Clipboard`] handle is opened per call; the handle is
//! not `Send` on every platform.

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("cannot open the clipboard: {0}")]
    Access(String),

    #[error("cannot write to the clipboard: {0}")]
    Set(String),

    #[error("nothing to copy")]
    Empty,
}

/// Replace the clipboard contents with `text`.
///
/// # Errors
///
/// [`ClipboardError::Empty`] for whitespace-only text, otherwise the
/// clipboard's own failures.
pub fn copy_text(text: &str) -> Result<(), ClipboardError> {
    if text.trim().is_empty() {
        return Err(ClipboardError::Empty);
    }
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::Set(e.to_string()))
}
