//! Background task that serves form submissions.
//!
//! The egui thread never awaits anything.  It sends
//! [`AssistantCommand::Submit`] over an mpsc channel and drains
//! [`AssistantEvent`]s with `try_recv` every frame.

use tokio::sync::mpsc;

use super::runner::Orchestrator;
use super::submission::{Reply, Submission};

/// Commands sent from the form to the worker.
#[derive(Debug)]
pub enum AssistantCommand {
    Submit(Submission),
}

/// Progress reported back to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantEvent {
    /// The worker picked up a submission.
    Started,
    /// The submission finished, successfully or with an error reply.
    Finished(Reply),
}

/// Handle commands until `command_rx` is closed.
///
/// Submissions are processed one at a time in arrival order.  The loop also
/// ends once nobody listens on `event_tx`.
pub async fn run_worker(
    orchestrator: Orchestrator,
    mut command_rx: mpsc::Receiver<AssistantCommand>,
    event_tx: mpsc::Sender<AssistantEvent>,
) {
    while let Some(command) = command_rx.recv().await {
        match command {
            AssistantCommand::Submit(submission) => {
                if event_tx.send(AssistantEvent::Started).await.is_err() {
                    break;
                }
                let reply = orchestrator.handle(submission).await;
                if event_tx.send(AssistantEvent::Finished(reply)).await.is_err() {
                    break;
                }
            }
        }
    }

    log::info!("worker: command channel closed, shutting down");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::chat::{ChatClient, ChatError};
    use crate::ocr::{OcrEngine, OcrError};
    use crate::stt::MockSttEngine;
    use crate::tts::{SpeechSynthesizer, TtsError};
    use crate::types::Language;

    struct Echo;

    #[async_trait]
    impl ChatClient for Echo {
        async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct NoTts;

    #[async_trait]
    impl SpeechSynthesizer for NoTts {
        async fn synthesize(&self, _text: &str, _language: Language) -> Result<PathBuf, TtsError> {
            Err(TtsError::EmptyText)
        }
    }

    struct NoOcr;

    #[async_trait]
    impl OcrEngine for NoOcr {
        async fn extract_text(&self, _image: &[u8], _mime: &str) -> Result<String, OcrError> {
            Err(OcrError::NoText)
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Arc::new(Echo),
            Arc::new(NoTts),
            Arc::new(MockSttEngine::ok("")),
            Arc::new(NoOcr),
        )
    }

    #[tokio::test]
    async fn each_submission_emits_started_then_finished() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (evt_tx, mut evt_rx) = mpsc::channel(8);

        cmd_tx
            .send(AssistantCommand::Submit(Submission::text("one")))
            .await
            .unwrap();
        cmd_tx
            .send(AssistantCommand::Submit(Submission::text("two")))
            .await
            .unwrap();
        drop(cmd_tx);

        run_worker(orchestrator(), cmd_rx, evt_tx).await;

        let mut events = Vec::new();
        while let Some(event) = evt_rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                AssistantEvent::Started,
                AssistantEvent::Finished(Reply::text_only("echo: one")),
                AssistantEvent::Started,
                AssistantEvent::Finished(Reply::text_only("echo: two")),
            ]
        );
    }

    #[tokio::test]
    async fn stops_when_event_receiver_is_dropped() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (evt_tx, evt_rx) = mpsc::channel(1);
        drop(evt_rx);

        cmd_tx
            .send(AssistantCommand::Submit(Submission::text("lost")))
            .await
            .unwrap();

        // Returns even though the command sender is still alive.
        run_worker(orchestrator(), cmd_rx, evt_tx).await;
        assert!(cmd_tx.is_closed());
    }
}
