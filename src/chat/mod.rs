//! Chat completion — the remote model that writes the reply.
//!
//! * [`ChatClient`] — async trait implemented by every completion backend.
//! * [`ApiChatClient`] — OpenAI-compatible REST implementation.
//! * [`ChatError`] — error variants for a completion call.

pub mod client;

pub use client::{ApiChatClient, ChatClient, ChatError};
