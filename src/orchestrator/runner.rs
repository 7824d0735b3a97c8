//! Request orchestrator: attachment → text → chat → (speech) → reply.
//!
//! ```text
//! Submission
//!   ├─ attachment? ─▶ classify ─┬─ pdf / docx ─▶ extract_document
//!   │                           ├─ txt / md   ─▶ decode_plain_text
//!   │                           ├─ image      ─▶ OcrEngine (async)
//!   │                           └─ wav        ─▶ spawn_blocking(decode + SttEngine)
//!   ├─ empty? ─▶ EmptyInput
//!   ├─ ChatClient::complete
//!   └─ audio mode? ─▶ SpeechSynthesizer::synthesize
//! ```
//!
//! [`Orchestrator::handle`] never fails: every error becomes an
//! `"Error: ..."` [`Reply`] and is logged.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::audio::{decode_wav, AudioError};
use crate::chat::{ChatClient, ChatError};
use crate::extract::{decode_plain_text, extract_document, AttachmentKind, ExtractError};
use crate::ocr::{OcrEngine, OcrError};
use crate::stt::{SttEngine, SttError};
use crate::tts::{SpeechSynthesizer, TtsError};
use crate::types::{Language, ResponseMode};

use super::submission::{Attachment, Reply, Submission};

// ---------------------------------------------------------------------------
// AssistantError
// ---------------------------------------------------------------------------

/// Everything that can go wrong while handling one submission.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("please enter a question or attach a file")]
    EmptyInput,

    #[error("unsupported attachment type: {0}")]
    UnsupportedAttachment(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Stt(#[from] SttError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Tts(#[from] TtsError),

    /// A blocking task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Turns a [`Submission`] into a [`Reply`] using the injected services.
///
/// Cheap to share: every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct Orchestrator {
    chat: Arc<dyn ChatClient>,
    tts: Arc<dyn SpeechSynthesizer>,
    stt: Arc<dyn SttEngine>,
    ocr: Arc<dyn OcrEngine>,
}

impl Orchestrator {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        tts: Arc<dyn SpeechSynthesizer>,
        stt: Arc<dyn SttEngine>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            chat,
            tts,
            stt,
            ocr,
        }
    }

    /// Handle one submission end to end.
    pub async fn handle(&self, submission: Submission) -> Reply {
        let started = Instant::now();
        match self.try_handle(submission).await {
            Ok(reply) => {
                log::info!(
                    "request done in {} ms (audio: {})",
                    started.elapsed().as_millis(),
                    reply.audio_path.is_some()
                );
                reply
            }
            Err(e) => {
                log::error!("request failed: {e}");
                Reply::from_error(&e)
            }
        }
    }

    async fn try_handle(&self, submission: Submission) -> Result<Reply, AssistantError> {
        let Submission {
            raw_text,
            attachment,
            language,
            response_mode,
        } = submission;

        let prompt = match attachment {
            Some(attachment) => self.attachment_text(attachment, language).await?,
            None => raw_text.unwrap_or_default(),
        };

        if prompt.trim().is_empty() {
            return Err(AssistantError::EmptyInput);
        }

        log::debug!("chat: prompt of {} chars", prompt.chars().count());
        let text = self.chat.complete(&prompt).await?;

        let audio_path = match response_mode {
            ResponseMode::Text => None,
            ResponseMode::Audio => Some(self.tts.synthesize(&text, language).await?),
        };

        Ok(Reply {
            text,
            audio_path,
            failed: false,
        })
    }

    /// Resolve an attachment to the text that replaces the typed question.
    async fn attachment_text(
        &self,
        attachment: Attachment,
        language: Language,
    ) -> Result<String, AssistantError> {
        let kind = AttachmentKind::classify(&attachment.name)
            .ok_or_else(|| AssistantError::UnsupportedAttachment(attachment.extension_label()))?;

        log::info!(
            "attachment {:?}: {} ({} bytes)",
            attachment.name,
            kind.label(),
            attachment.bytes.len()
        );

        match kind {
            AttachmentKind::Document(doc) => Ok(extract_document(&attachment.bytes, doc)?),
            AttachmentKind::PlainText => Ok(decode_plain_text(&attachment.bytes)?),
            AttachmentKind::Image { mime } => {
                Ok(self.ocr.extract_text(&attachment.bytes, mime).await?)
            }
            AttachmentKind::Audio => self.transcribe(attachment.bytes, language).await,
        }
    }

    /// Decode and transcribe a WAV recording on the blocking thread pool.
    async fn transcribe(&self, wav: Vec<u8>, language: Language) -> Result<String, AssistantError> {
        let stt = Arc::clone(&self.stt);

        tokio::task::spawn_blocking(move || -> Result<String, AssistantError> {
            let audio = decode_wav(&wav)?;
            log::debug!(
                "stt: {:.1}s recording at {} Hz x{} ch",
                audio.duration_secs(),
                audio.sample_rate,
                audio.channels
            );
            let samples = audio.to_whisper_input();
            Ok(stt.transcribe(&samples, language)?)
        })
        .await
        .map_err(|e| AssistantError::Internal(e.to_string()))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
