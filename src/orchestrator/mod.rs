//! Request orchestration for the assistant form.
//!
//! # Architecture
//!
//! ```text
//! AssistantApp (egui) ──AssistantCommand::Submit──▶ run_worker  ← tokio task
//!        ▲                                              │
//!        │                                     Orchestrator::handle
//!        │                                              │
//!        └──────── AssistantEvent::{Started, Finished(Reply)} ◀─┘
//! ```
//!
//! The orchestrator owns no state of its own; its collaborators are
//! injected at construction so tests can substitute doubles.

pub mod runner;
pub mod state;
pub mod submission;
pub mod worker;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{AssistantError, Orchestrator};
pub use state::RequestState;
pub use submission::{Attachment, Reply, Submission};
pub use worker::{run_worker, AssistantCommand, AssistantEvent};
