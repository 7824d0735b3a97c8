//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a hand-edited `settings.toml`
//! only needs the keys it wants to override.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::types::{Language, ResponseMode};

// ---------------------------------------------------------------------------
// ChatConfig
// ---------------------------------------------------------------------------

/// Settings for the chat-completion service that produces the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible API (no trailing `/v1`).
    ///
    /// - OpenAI: `https://api.openai.com`
    /// - Ollama: `http://localhost:11434`
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature; provider default when `None`.
    pub temperature: Option<f32>,
    /// Completion length cap; provider default when `None`.
    pub max_tokens: Option<u32>,
    /// Maximum seconds to wait for a reply.
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            temperature: None,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// OcrConfig
// ---------------------------------------------------------------------------

/// Settings for image-to-text extraction through a vision-capable model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Vision model identifier (e.g. `"llava"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Instruction sent alongside the image.
    pub prompt: String,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "llava".into(),
            prompt: "Transcribe all text visible in this image exactly as written. \
                     Reply with the text only."
                .into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceRef / VoiceTable
// ---------------------------------------------------------------------------

/// Reference to one of the voices listed in [`TtsConfig::voices`].
///
/// In TOML an integer is a position in the list and a string is a voice
/// name: `en = 0`, `fr = "nova"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoiceRef {
    Index(usize),
    Name(String),
}

/// Declared language → voice mapping.
///
/// The defaults reproduce the historical behaviour: English and Kiswahili
/// share the first voice (there is no dedicated Kiswahili voice) and French
/// uses the second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceTable {
    pub en: VoiceRef,
    pub sw: VoiceRef,
    pub fr: VoiceRef,
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self {
            en: VoiceRef::Index(0),
            sw: VoiceRef::Index(0),
            fr: VoiceRef::Index(1),
        }
    }
}

impl VoiceTable {
    /// The declared voice for `language`.
    pub fn get(&self, language: Language) -> &VoiceRef {
        match language {
            Language::En => &self.en,
            Language::Sw => &self.sw,
            Language::Fr => &self.fr,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for reply speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Speech model identifier (e.g. `"tts-1"`).
    pub model: String,
    /// Voices the speech endpoint offers, in preference order.
    pub voices: Vec<String>,
    /// Container requested from the endpoint.  Only `"wav"` can be played
    /// back inside the window.
    pub format: String,
    /// Speaking-rate multiplier (1.0 = normal).
    pub speed: f32,
    pub timeout_secs: u64,
    /// Where reply audio is written.  `None` uses [`AppPaths::audio_dir`].
    pub output_dir: Option<PathBuf>,
    /// Which voice each language uses.  Kept last: it is a TOML sub-table.
    pub voice_table: VoiceTable,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "tts-1".into(),
            voices: vec!["alloy".into(), "nova".into()],
            format: "wav".into(),
            speed: 1.0,
            timeout_secs: 60,
            output_dir: None,
            voice_table: VoiceTable::default(),
        }
    }
}

impl TtsConfig {
    /// The directory reply audio is written to.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().audio_dir)
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// GGML model file stem under the models directory (e.g. `"ggml-base"`).
    pub model: String,
    /// Attempt GPU-accelerated inference when available.
    pub use_gpu: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base".into(),
            use_gpu: false,
        }
    }
}

impl SttConfig {
    /// Full path of the configured model file.
    pub fn model_path(&self) -> PathBuf {
        AppPaths::new().models_dir.join(format!("{}.bin", self.model))
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window and form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)`.
    pub window_size: (f32, f32),
    /// Language preselected in the dropdown.
    pub default_language: Language,
    /// Response type preselected in the dropdown.
    pub default_response_mode: ResponseMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (640.0, 580.0),
            default_language: Language::En,
            default_response_mode: ResponseMode::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use smart_assistant::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// # let _ = config;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chat: ChatConfig,
    pub ocr: OcrConfig,
    pub tts: TtsConfig,
    pub stt: SttConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.chat.base_url, loaded.chat.base_url);
        assert_eq!(original.chat.model, loaded.chat.model);
        assert_eq!(original.chat.api_key, loaded.chat.api_key);
        assert_eq!(original.ocr.model, loaded.ocr.model);
        assert_eq!(original.tts.voices, loaded.tts.voices);
        assert_eq!(original.tts.voice_table, loaded.tts.voice_table);
        assert_eq!(original.tts.format, loaded.tts.format);
        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.ui.default_language, loaded.ui.default_language);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.chat.model, "gpt-3.5-turbo");
        assert_eq!(config.tts.voice_table, VoiceTable::default());
    }

    #[test]
    fn default_voice_table_shares_english_voice_with_swahili() {
        let table = VoiceTable::default();
        assert_eq!(table.get(Language::En), table.get(Language::Sw));
        assert_eq!(table.get(Language::Fr), &VoiceRef::Index(1));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            r#"
[chat]
model = "gpt-4o-mini"
api_key = "sk-test"

[tts.voice_table]
fr = "echo"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.chat.model, "gpt-4o-mini");
        assert_eq!(cfg.chat.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.chat.base_url, "https://api.openai.com");
        assert_eq!(cfg.tts.voice_table.fr, VoiceRef::Name("echo".into()));
        assert_eq!(cfg.tts.voice_table.en, VoiceRef::Index(0));
        assert_eq!(cfg.ocr.model, "llava");
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.chat.temperature = Some(0.2);
        cfg.chat.max_tokens = Some(512);
        cfg.tts.output_dir = Some(dir.path().join("replies"));
        cfg.tts.voices = vec!["only".into()];
        cfg.ui.default_language = Language::Sw;
        cfg.ui.default_response_mode = ResponseMode::Audio;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.chat.temperature, Some(0.2));
        assert_eq!(loaded.chat.max_tokens, Some(512));
        assert_eq!(loaded.tts.output_dir, Some(dir.path().join("replies")));
        assert_eq!(loaded.tts.voices, vec!["only".to_string()]);
        assert_eq!(loaded.ui.default_language, Language::Sw);
        assert_eq!(loaded.ui.default_response_mode, ResponseMode::Audio);
    }
}
