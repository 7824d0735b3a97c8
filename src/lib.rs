//! Smart Assistant — a desktop form that answers questions with a chat
//! model, reading the question from typed text, documents, images or voice
//! recordings, and optionally speaking the reply.
//!
//! The binary (`src/main.rs`) wires these modules together; everything here
//! is usable on its own and tested in isolation.

pub mod app;
pub mod audio;
pub mod chat;
pub mod clipboard;
pub mod config;
pub mod extract;
pub mod ocr;
pub mod orchestrator;
pub mod stt;
pub mod tts;
pub mod types;
