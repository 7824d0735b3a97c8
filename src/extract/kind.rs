//! Attachment classification by file extension.

use std::path::Path;

/// Document formats with a dedicated text extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
}

/// Every attachment type the orchestrator knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Document(DocumentKind),
    PlainText,
    /// Image sent to OCR; `mime` is used for the `data:` URL.
    Image { mime: &'static str },
    /// WAV recording sent to speech-to-text.
    Audio,
}

impl AttachmentKind {
    /// Classify `file_name` by its extension.
    ///
    /// Returns `None` for unknown extensions and for names without one.
    ///
    /// ```
    /// use smart_assistant::extract::{AttachmentKind, DocumentKind};
    ///
    /// assert_eq!(
    ///     AttachmentKind::classify("Report.PDF"),
    ///     Some(AttachmentKind::Document(DocumentKind::Pdf))
    /// );
    /// assert_eq!(AttachmentKind::classify("notes.doc"), None);
    /// ```
    pub fn classify(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();

        let kind = match ext.as_str() {
            "pdf" => AttachmentKind::Document(DocumentKind::Pdf),
            "docx" => AttachmentKind::Document(DocumentKind::Word),
            "txt" | "md" => AttachmentKind::PlainText,
            "png" => AttachmentKind::Image { mime: "image/png" },
            "jpg" | "jpeg" => AttachmentKind::Image { mime: "image/jpeg" },
            "gif" => AttachmentKind::Image { mime: "image/gif" },
            "webp" => AttachmentKind::Image { mime: "image/webp" },
            "bmp" => AttachmentKind::Image { mime: "image/bmp" },
            "wav" => AttachmentKind::Audio,
            _ => return None,
        };
        Some(kind)
    }

    /// Short label for logs and the attachment row of the form.
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Document(DocumentKind::Pdf) => "PDF",
            AttachmentKind::Document(DocumentKind::Word) => "Word",
            AttachmentKind::PlainText => "text",
            AttachmentKind::Image { .. } => "image",
            AttachmentKind::Audio => "audio",
        }
    }
}
