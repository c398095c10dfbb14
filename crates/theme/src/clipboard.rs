use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write to clipboard: {0}")]
    Write(String),
}

/// Host clipboard. Implemented by the CLI over the system clipboard.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Result of exporting a theme to the clipboard.
///
/// The exported text is always present. A copy failure is reported next to
/// it so the caller can still show the text for manual copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardExport {
    pub text: String,
    pub copied: Result<(), ClipboardError>,
}

impl ClipboardExport {
    pub fn is_copied(&self) -> bool {
        self.copied.is_ok()
    }
}
