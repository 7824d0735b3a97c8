//! Document text extraction and attachment classification.
//!
//! ```text
//! Attachment { name, bytes }
//!        │
//!        ▼
//! AttachmentKind::classify(name)     (by extension, case-insensitive)
//!        ├─ Document(Pdf)   → pdf::extract_pdf    pages concatenated in order
//!        ├─ Document(Word)  → word::extract_docx  body paragraphs in order
//!        ├─ PlainText       → decode_plain_text   UTF-8
//!        ├─ Image { mime }  → OCR (see crate::ocr)
//!        ├─ Audio           → STT (see crate::stt)
//!        └─ None            → unsupported
//! ```
//!
//! Neither extractor inserts separators between pages or paragraphs.

pub mod kind;
pub mod pdf;
pub mod word;

pub use kind::{AttachmentKind, DocumentKind};
pub use pdf::extract_pdf;
pub use word::extract_docx;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ExtractError
// ---------------------------------------------------------------------------

/// Errors raised while turning a document into plain text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// The PDF could not be parsed or a page could not be decoded.
    #[error("cannot read PDF: {0}")]
    Pdf(String),

    /// The PDF is password protected.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The Word archive or its `document.xml` is missing or malformed.
    #[error("cannot read Word document: {0}")]
    Word(String),

    /// A plain-text attachment is not valid UTF-8.
    #[error("text file is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Extract the text of a PDF or Word document.
pub fn extract_document(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Word => extract_docx(bytes),
    }
}

/// Decode a `.txt` / `.md` attachment, dropping a leading UTF-8 BOM.
pub fn decode_plain_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractError::Encoding(e.to_string()))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_strips_bom() {
        let bytes = "\u{feff}hello".as_bytes();
        assert_eq!(decode_plain_text(bytes).unwrap(), "hello");
    }

    #[test]
    fn plain_text_rejects_invalid_utf8() {
        let err = decode_plain_text(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractError::Encoding(_)));
    }

    #[test]
    fn dispatch_reports_format_specific_errors() {
        assert!(matches!(
            extract_document(b"not a pdf", DocumentKind::Pdf),
            Err(ExtractError::Pdf(_))
        ));
        assert!(matches!(
            extract_document(b"not a zip", DocumentKind::Word),
            Err(ExtractError::Word(_))
        ));
    }
}
