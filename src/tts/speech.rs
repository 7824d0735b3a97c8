//! Speech synthesis through an OpenAI-compatible `/v1/audio/speech` endpoint.
//!
//! Every call writes a new file named `reply-<uuid>.<format>` into the
//! output directory, so concurrent audio replies never share a path.
//!
//! Only the latest reply is kept on disk: writing a new reply removes the
//! previous one, dropping the synthesizer removes the last one, and
//! [`ApiSynthesizer::purge_stale`] clears leftovers from earlier sessions.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::TtsConfig;
use crate::types::Language;

use super::voice::resolve_voice;
use super::{SpeechSynthesizer, TtsError};

/// HTTP speech-synthesis backend.
pub struct ApiSynthesizer {
    client: reqwest::Client,
    config: TtsConfig,
    output_dir: PathBuf,
    /// Most recent reply file, removed when superseded.
    latest: Mutex<Option<PathBuf>>,
}

impl ApiSynthesizer {
    /// Build from config, writing into `config.resolved_output_dir()`.
    pub fn from_config(config: &TtsConfig) -> Self {
        Self::with_output_dir(config, config.resolved_output_dir())
    }

    /// Build from config, writing into an explicit directory.
    pub fn with_output_dir(config: &TtsConfig, output_dir: impl Into<PathBuf>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            output_dir: output_dir.into(),
            latest: Mutex::new(None),
        }
    }

    /// Directory reply audio is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn next_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{REPLY_PREFIX}{}.{}", Uuid::new_v4(), self.config.format))
    }

    /// Delete reply files left in the output directory by earlier runs.
    ///
    /// Returns how many files were removed; a missing directory counts as
    /// zero.  Other files in the directory are left alone.
    pub fn purge_stale(&self) -> std::io::Result<usize> {
        let entries = match std::fs::read_dir(&self.output_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let current = self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if !is_reply_file(&path) || current.as_deref() == Some(path.as_path()) {
                continue;
            }
            std::fs::remove_file(&path)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Record `path` as the latest reply and delete the one it replaces.
    async fn supersede(&self, path: &Path) {
        let previous = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(path.to_path_buf());

        if let Some(previous) = previous {
            if let Err(e) = tokio::fs::remove_file(&previous).await {
                log::warn!("tts: cannot remove {}: {e}", previous.display());
            }
        }
    }
}

const REPLY_PREFIX: &str = "reply-";

fn is_reply_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(REPLY_PREFIX))
}

impl Drop for ApiSynthesizer {
    fn drop(&mut self) {
        let latest = self.latest.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(path) = latest {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("tts: cannot remove {}: {e}", path.display());
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ApiSynthesizer {
    async fn synthesize(&self, text: &str, language: Language) -> Result<PathBuf, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        let voice = resolve_voice(&self.config.voice_table, &self.config.voices, language)?;
        log::debug!(
            "tts: language={language} voice={} (#{}) chars={}",
            voice.name,
            voice.index,
            text.chars().count()
        );

        let url = format!(
            "{}/v1/audio/speech",
            self.config.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model":           self.config.model,
            "input":           text,
            "voice":           voice.name,
            "response_format": self.config.format,
            "speed":           self.config.speed
        });

        let mut req = self.client.post(&url).json(&body);
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| TtsError::Io(format!("{}: {e}", self.output_dir.display())))?;

        let path = self.next_path();
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| TtsError::Io(format!("{}: {e}", path.display())))?;

        log::info!("tts: wrote {} bytes to {}", audio.len(), path.display());
        self.supersede(&path).await;
        Ok(path)
    }
}
