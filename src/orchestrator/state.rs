//! Request state shown by the form.
//!
//! The form folds worker events into a [`RequestState`] and renders from it
//! each frame.

use super::submission::Reply;
use super::worker::AssistantEvent;

/// Lifecycle of the form's current request.
///
/// ```text
/// Idle ──submit──▶ Pending ──Started──▶ Working ──Finished──▶ Done | Failed
/// Done / Failed ──submit──▶ Pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    /// Sent to the worker, not yet picked up.
    Pending,
    Working,
    Done,
    Failed,
}

impl RequestState {
    /// While busy the Submit button is disabled.
    ///
    /// ```
    /// use smart_assistant::orchestrator::RequestState;
    ///
    /// assert!(RequestState::Pending.is_busy());
    /// assert!(RequestState::Working.is_busy());
    /// assert!(!RequestState::Done.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestState::Pending | RequestState::Working)
    }

    /// Short status label for the form.
    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "Ready",
            RequestState::Pending => "Queued…",
            RequestState::Working => "Working…",
            RequestState::Done => "Done",
            RequestState::Failed => "Failed",
        }
    }

    /// Next state after `event`; a finished reply also lands in `reply`.
    ///
    /// Done or Failed follows the reply's `failed` flag, never its text.
    pub fn apply(self, event: AssistantEvent, reply: &mut Option<Reply>) -> Self {
        match event {
            AssistantEvent::Started => RequestState::Working,
            AssistantEvent::Finished(r) => {
                let next = if r.is_error() {
                    RequestState::Failed
                } else {
                    RequestState::Done
                };
                *reply = Some(r);
                next
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_default_and_not_busy() {
        assert_eq!(RequestState::default(), RequestState::Idle);
        assert!(!RequestState::Idle.is_busy());
        assert!(!RequestState::Failed.is_busy());
    }

    #[test]
    fn started_moves_to_working() {
        let mut reply = None;
        let next = RequestState::Pending.apply(AssistantEvent::Started, &mut reply);
        assert_eq!(next, RequestState::Working);
        assert!(reply.is_none());
    }

    #[test]
    fn finished_stores_reply() {
        let mut reply = None;
        let next = RequestState::Working.apply(
            AssistantEvent::Finished(Reply::text_only("hello")),
            &mut reply,
        );
        assert_eq!(next, RequestState::Done);
        assert_eq!(reply.unwrap().text, "hello");
    }

    #[test]
    fn error_reply_is_failed() {
        let mut reply = None;
        let next = RequestState::Working.apply(
            AssistantEvent::Finished(Reply::from_error(&std::fmt::Error)),
            &mut reply,
        );
        assert_eq!(next, RequestState::Failed);
        assert!(reply.unwrap().text.starts_with("Error: "));
    }

    #[test]
    fn answer_with_error_prefix_is_done() {
        let mut reply = None;
        let next = RequestState::Working.apply(
            AssistantEvent::Finished(Reply::text_only("Error: is a noun.")),
            &mut reply,
        );
        assert_eq!(next, RequestState::Done);
    }
}
