//! Image-to-text extraction (OCR).
//!
//! [`OcrEngine`] is the seam the orchestrator calls; [`VisionOcr`] is the
//! production backend.  Failures are always an [`OcrError`], never text that
//! merely describes an error.

pub mod vision;

pub use vision::VisionOcr;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while reading text from an image.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("image is empty")]
    EmptyImage,

    #[error("OCR request failed: {0}")]
    Request(String),

    #[error("OCR request timed out")]
    Timeout,

    #[error("OCR service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse OCR response: {0}")]
    Parse(String),

    /// The model answered but found no text.
    #[error("no text found in image")]
    NoText,
}

impl From<reqwest::Error> for OcrError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OcrError::Timeout
        } else {
            OcrError::Request(e.to_string())
        }
    }
}

/// Object-safe image-to-text interface.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Read the text in `image`, whose media type is `mime`.
    async fn extract_text(&self, image: &[u8], mime: &str) -> Result<String, OcrError>;
}
