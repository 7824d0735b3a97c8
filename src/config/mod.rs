//! Configuration module for the assistant.
//!
//! Provides `AppConfig` (top-level settings), one sub-config per external
//! service, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, ChatConfig, OcrConfig, SttConfig, TtsConfig, UiConfig, VoiceRef, VoiceTable,
};
