//! Smart Assistant form — egui/eframe application.
//!
//! # Architecture
//!
//! [`AssistantApp`] is the top-level [`eframe::App`].  It owns the form
//! fields and two channel endpoints:
//!
//! * `command_tx` — sends [`AssistantCommand`] to the worker task.
//! * `event_rx`   — receives [`AssistantEvent`]s, drained every frame.
//!
//! # Layout
//!
//! | Row | Widgets |
//! |-----|---------|
//! | Question | multi-line text input |
//! | Attachment | path field, Browse-by-drop hint, Clear |
//! | Options | language + response-type dropdowns, Submit, spinner |
//! | Response | read-only text, Copy |
//! | Audio | file name, Play / Stop (audio replies only) |

use std::path::Path;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::audio::{decode_wav_file, AudioPlayer, PlaybackHandle};
use crate::clipboard;
use crate::config::AppConfig;
use crate::orchestrator::{
    AssistantCommand, AssistantEvent, Attachment, Reply, RequestState, Submission,
};
use crate::types::{Language, ResponseMode};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(68, 136, 255);
const ERROR: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const DIM: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);

// ---------------------------------------------------------------------------
// AssistantApp
// ---------------------------------------------------------------------------

/// eframe application — the assistant form.
pub struct AssistantApp {
    // ── Form fields ──────────────────────────────────────────────────────
    question: String,
    /// Typed or dropped attachment path; empty means none.
    attachment_path: String,
    language: Language,
    response_mode: ResponseMode,

    // ── Request state ────────────────────────────────────────────────────
    state: RequestState,
    reply: Option<Reply>,
    /// One-line feedback for local actions (copy, playback, bad path).
    notice: Option<String>,

    // ── Playback ─────────────────────────────────────────────────────────
    /// Opened on first Play.
    player: Option<AudioPlayer>,
    playback: Option<PlaybackHandle>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<AssistantCommand>,
    event_rx: mpsc::Receiver<AssistantEvent>,
}

impl AssistantApp {
    /// Create the form with the dropdowns preset from `config.ui`.
    pub fn new(
        command_tx: mpsc::Sender<AssistantCommand>,
        event_rx: mpsc::Receiver<AssistantEvent>,
        config: &AppConfig,
    ) -> Self {
        Self {
            question: String::new(),
            attachment_path: String::new(),
            language: config.ui.default_language,
            response_mode: config.ui.default_response_mode,
            state: RequestState::Idle,
            reply: None,
            notice: None,
            player: None,
            playback: None,
            command_tx,
            event_rx,
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending worker events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.state = self.state.apply(event, &mut self.reply);
        }
    }

    /// Take the first file dropped onto the window this frame.
    fn take_dropped_file(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            log::info!("attachment dropped: {}", path.display());
            self.attachment_path = path.display().to_string();
            self.notice = None;
        }
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Assemble a [`Submission`] from the form fields.
    ///
    /// The attachment file is read here; a bad path is reported without
    /// contacting the worker.
    fn build_submission(&self) -> Result<Submission, String> {
        let raw_text = Some(self.question.clone()).filter(|q| !q.trim().is_empty());

        let path = self.attachment_path.trim();
        let attachment = if path.is_empty() {
            None
        } else {
            let attachment = Attachment::from_path(Path::new(path))
                .map_err(|e| format!("cannot read attachment {path}: {e}"))?;
            Some(attachment)
        };

        Ok(Submission {
            raw_text,
            attachment,
            language: self.language,
            response_mode: self.response_mode,
        })
    }

    fn submit(&mut self) {
        if self.state.is_busy() {
            return;
        }

        let submission = match self.build_submission() {
            Ok(submission) => submission,
            Err(message) => {
                log::warn!("{message}");
                self.notice = Some(message);
                return;
            }
        };

        match self.command_tx.try_send(AssistantCommand::Submit(submission)) {
            Ok(()) => {
                self.state = RequestState::Pending;
                self.reply = None;
                self.notice = None;
                self.playback = None;
            }
            Err(e) => {
                log::error!("worker unavailable: {e}");
                self.notice = Some("The assistant is not running; restart the app.".into());
            }
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn copy_reply(&mut self) {
        let Some(reply) = &self.reply else { return };
        match clipboard::copy_text(&reply.text) {
            Ok(()) => {
                log::info!("copied {} chars to clipboard", reply.text.chars().count());
                self.notice = Some("Copied to clipboard.".into());
            }
            Err(e) => {
                log::warn!("copy failed: {e}");
                self.notice = Some(format!("Copy failed: {e}"));
            }
        }
    }

    fn play(&mut self, path: &Path) {
        if self.player.is_none() {
            match AudioPlayer::new() {
                Ok(player) => self.player = Some(player),
                Err(e) => {
                    log::warn!("playback unavailable: {e}");
                    self.notice = Some(format!("Cannot play audio: {e}"));
                    return;
                }
            }
        }
        let Some(player) = &self.player else { return };

        let result = decode_wav_file(path).and_then(|audio| player.play(&audio));
        match result {
            Ok(handle) => self.playback = Some(handle),
            Err(e) => {
                log::warn!("playback of {} failed: {e}", path.display());
                self.notice = Some(format!("Cannot play audio: {e}"));
            }
        }
    }

    fn stop(&mut self) {
        self.playback = None;
    }

    // ── Rows ─────────────────────────────────────────────────────────────

    fn draw_question(&mut self, ui: &mut egui::Ui) {
        ui.label("Question");
        ui.add(
            egui::TextEdit::multiline(&mut self.question)
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .hint_text("Ask anything, or attach a file below"),
        );
    }

    fn draw_attachment(&mut self, ui: &mut egui::Ui) {
        ui.label("Attachment");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.attachment_path)
                    .desired_width(ui.available_width() - 60.0)
                    .hint_text("Drop a file here or type its path"),
            );
            if ui.button("Clear").clicked() {
                self.attachment_path.clear();
            }
        });
        ui.label(
            egui::RichText::new("pdf · docx · txt · md · png · jpg · gif · webp · bmp · wav")
                .color(DIM)
                .size(11.0),
        );
    }

    fn draw_options(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Language")
                .selected_text(self.language.code())
                .show_ui(ui, |ui| {
                    for language in Language::ALL {
                        ui.selectable_value(&mut self.language, language, language.code());
                    }
                });

            egui::ComboBox::from_label("Response")
                .selected_text(self.response_mode.as_str())
                .show_ui(ui, |ui| {
                    for mode in ResponseMode::ALL {
                        ui.selectable_value(&mut self.response_mode, mode, mode.as_str());
                    }
                });

            let busy = self.state.is_busy();
            if ui.add_enabled(!busy, egui::Button::new("Submit")).clicked() {
                self.submit();
            }
            if busy {
                ui.spinner();
                ui.label(egui::RichText::new(self.state.label()).color(ACCENT));
            }
        });
    }

    fn draw_response(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Response");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let has_reply = self.reply.is_some();
                if ui.add_enabled(has_reply, egui::Button::new("Copy")).clicked() {
                    self.copy_reply();
                }
            });
        });

        let failed = self.state == RequestState::Failed;
        let mut text = self.reply.as_ref().map(|r| r.text.as_str()).unwrap_or("");
        egui::ScrollArea::vertical()
            .max_height(200.0)
            .show(ui, |ui| {
                let edit = egui::TextEdit::multiline(&mut text)
                    .desired_rows(8)
                    .desired_width(f32::INFINITY);
                let edit = if failed { edit.text_color(ERROR) } else { edit };
                ui.add(edit);
            });
    }

    fn draw_audio(&mut self, ui: &mut egui::Ui) {
        let Some(path) = self.reply.as_ref().and_then(|r| r.audio_path.clone()) else {
            return;
        };

        if self.playback.as_ref().is_some_and(|p| p.is_finished()) {
            self.playback = None;
        }

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(file_label(&path)).color(DIM));
            if self.playback.is_some() {
                if ui.button("Stop").clicked() {
                    self.stop();
                }
            } else if ui.button("Play").clicked() {
                self.play(&path);
            }
        });
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for AssistantApp {
    /// Called every frame by eframe.  Polls the worker, then renders the form.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.take_dropped_file(ctx);

        // Keep polling while a request or playback is in flight.
        if self.state.is_busy() || self.playback.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_question(ui);
            ui.add_space(6.0);
            self.draw_attachment(ui);
            ui.add_space(6.0);
            self.draw_options(ui);
            ui.separator();
            self.draw_response(ui);
            self.draw_audio(ui);

            if let Some(notice) = &self.notice {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(notice.as_str()).color(DIM).size(11.0));
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Smart Assistant closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (
        AssistantApp,
        mpsc::Receiver<AssistantCommand>,
        mpsc::Sender<AssistantEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (evt_tx, evt_rx) = mpsc::channel(4);
        let mut config = AppConfig::default();
        config.ui.default_language = Language::Sw;
        (AssistantApp::new(cmd_tx, evt_rx, &config), cmd_rx, evt_tx)
    }

    #[test]
    fn dropdowns_start_from_config() {
        let (app, _, _) = app();
        assert_eq!(app.language, Language::Sw);
        assert_eq!(app.response_mode, ResponseMode::Text);
    }

    #[test]
    fn blank_question_is_omitted() {
        let (mut app, _, _) = app();
        app.question = "   ".into();
        let submission = app.build_submission().unwrap();
        assert!(submission.raw_text.is_none());
        assert!(submission.attachment.is_none());
    }

    #[test]
    fn missing_attachment_path_is_reported_locally() {
        let (mut app, mut cmd_rx, _) = app();
        app.attachment_path = "/no/such/file.pdf".into();

        app.submit();

        assert!(app.notice.as_deref().unwrap().contains("/no/such/file.pdf"));
        assert_eq!(app.state, RequestState::Idle);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn attachment_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.txt");
        std::fs::write(&path, "what is rust?").unwrap();

        let (mut app, _, _) = app();
        app.attachment_path = path.display().to_string();
        let submission = app.build_submission().unwrap();

        let attachment = submission.attachment.unwrap();
        assert_eq!(attachment.name, "q.txt");
        assert_eq!(attachment.bytes, b"what is rust?");
    }

    #[test]
    fn submit_sends_one_command_and_blocks_resubmission() {
        let (mut app, mut cmd_rx, _) = app();
        app.question = "hello".into();

        app.submit();
        app.submit();

        assert_eq!(app.state, RequestState::Pending);
        assert!(matches!(cmd_rx.try_recv(), Ok(AssistantCommand::Submit(_))));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn finished_event_unlocks_the_form() {
        let (mut app, _cmd_rx, evt_tx) = app();
        app.question = "hello".into();
        app.submit();

        evt_tx.try_send(AssistantEvent::Started).unwrap();
        evt_tx
            .try_send(AssistantEvent::Finished(Reply::text_only("hi there")))
            .unwrap();
        app.poll_events();

        assert_eq!(app.state, RequestState::Done);
        assert!(!app.state.is_busy());
        assert_eq!(app.reply.unwrap().text, "hi there");
    }
}
