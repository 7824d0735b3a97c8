//! Request and reply values exchanged between the form and the orchestrator.

use std::path::{Path, PathBuf};

use crate::types::{Language, ResponseMode};

/// An uploaded file: its original name (used for classification) and bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read `path` from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// `".ext"` as written in the file name, or the whole name when it has
    /// no extension.
    pub fn extension_label(&self) -> String {
        match Path::new(&self.name).extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy()),
            None => self.name.clone(),
        }
    }
}

/// One form submission.
///
/// When an attachment is present its extracted text replaces `raw_text`.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub raw_text: Option<String>,
    pub attachment: Option<Attachment>,
    pub language: Language,
    pub response_mode: ResponseMode,
}

impl Submission {
    /// A text-only submission.
    pub fn text(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: Some(raw_text.into()),
            ..Self::default()
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_response_mode(mut self, response_mode: ResponseMode) -> Self {
        self.response_mode = response_mode;
        self
    }
}

/// What the form shows after a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Set only for successful audio-mode requests.
    pub audio_path: Option<PathBuf>,
    /// True when `text` describes a failure rather than a model answer.
    pub failed: bool,
}

impl Reply {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio_path: None,
            failed: false,
        }
    }

    /// The reply shown for any failed request.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        Self {
            text: format!("Error: {error}"),
            audio_path: None,
            failed: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.failed
    }
}
