//! Application entry point — Smart Assistant.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the chat, speech, OCR and Whisper services from config.
//! 5. Create the command / event channels.
//! 6. Spawn the request worker on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context;
use eframe::egui;
use tokio::sync::mpsc;

use smart_assistant::{
    app::AssistantApp,
    chat::{ApiChatClient, ChatClient},
    config::AppConfig,
    ocr::{OcrEngine, VisionOcr},
    orchestrator::{run_worker, AssistantCommand, AssistantEvent, Orchestrator},
    stt::{SttEngine, TranscribeParams, UnavailableStt, WhisperEngine},
    tts::{ApiSynthesizer, SpeechSynthesizer},
};

const WINDOW_TITLE: &str = "Smart Assistant";

// ---------------------------------------------------------------------------
// Service construction
// ---------------------------------------------------------------------------

/// Load the Whisper model, or a placeholder that reports why it is missing.
///
/// A missing model is not fatal: text, document and image requests still
/// work, and audio attachments answer with the load error.
fn build_stt(config: &AppConfig) -> Arc<dyn SttEngine> {
    let model_path = config.stt.model_path();
    let params = TranscribeParams {
        use_gpu: config.stt.use_gpu,
        ..TranscribeParams::default()
    };

    match WhisperEngine::load(&model_path, params) {
        Ok(engine) => {
            log::info!("Whisper model loaded: {}", model_path.display());
            Arc::new(engine)
        }
        Err(e) => {
            log::warn!("Could not load Whisper model: {e}. Audio attachments are disabled.");
            Arc::new(UnavailableStt::new(e))
        }
    }
}

fn build_orchestrator(config: &AppConfig) -> Orchestrator {
    let chat: Arc<dyn ChatClient> = Arc::new(ApiChatClient::from_config(&config.chat));

    let synthesizer = ApiSynthesizer::from_config(&config.tts);
    log::info!("reply audio directory: {}", synthesizer.output_dir().display());
    match synthesizer.purge_stale() {
        Ok(0) => {}
        Ok(n) => log::info!("removed {n} reply file(s) left by an earlier run"),
        Err(e) => log::warn!("could not clean reply audio directory: {e}"),
    }
    let tts: Arc<dyn SpeechSynthesizer> = Arc::new(synthesizer);

    let ocr: Arc<dyn OcrEngine> = Arc::new(VisionOcr::from_config(&config.ocr));

    Orchestrator::new(chat, tts, build_stt(config), ocr)
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([width, height])
        .with_min_inner_size([420.0, 360.0])
        .with_drag_and_drop(true);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Smart Assistant starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e:#}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads; Whisper runs on the blocking pool)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Services
    let orchestrator = build_orchestrator(&config);

    // 5. Channels
    let (command_tx, command_rx) = mpsc::channel::<AssistantCommand>(8);
    let (event_tx, event_rx) = mpsc::channel::<AssistantEvent>(16);

    // 6. Worker
    rt.spawn(run_worker(orchestrator, command_rx, event_tx));

    // 7. UI (blocks until the window is closed)
    let app = AssistantApp::new(command_tx, event_rx, &config);
    eframe::run_native(
        WINDOW_TITLE,
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;

    // Dropping the runtime here ends the worker once its channel closes.
    rt.shutdown_timeout(std::time::Duration::from_secs(2));
    log::info!("Smart Assistant stopped");
    Ok(())
}
