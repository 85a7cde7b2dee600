//! One chat panel's state: the transcript plus the in-flight flag.
//!
//! A turn is split so the caller can await the network without holding the
//! session: `begin_send` echoes the user message and hands back what to send,
//! then exactly one of `complete` or `abandon` ends it.

use crate::transcript::{HistoryEntry, Role, Transcript};

/// Snapshot taken when a turn starts.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundTurn {
    pub message: String,
    /// Transcript before the new user message, greeting included.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    transcript: Transcript,
    loading: bool,
}

impl ChatSession {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            loading: false,
        }
    }

    /// Start a turn. `None` when `input` is blank or a turn is already loading.
    pub fn begin_send(&mut self, input: &str) -> Option<OutboundTurn> {
        if input.trim().is_empty() || self.loading {
            return None;
        }
        let history = self.transcript.history();
        self.transcript.push(Role::User, input);
        self.loading = true;
        Some(OutboundTurn {
            message: input.to_string(),
            history,
        })
    }

    pub fn complete(&mut self, reply: impl Into<String>) {
        self.transcript.push(Role::Model, reply);
        self.loading = false;
    }

    /// End the turn without a reply.
    pub fn abandon(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::INITIAL_CHAT_MESSAGE;

    #[test]
    fn blank_input_is_ignored() {
        let mut session = ChatSession::default();
        for input in ["", "   ", "\n\t"] {
            assert!(session.begin_send(input).is_none());
        }
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_loading());
    }

    #[test]
    fn begin_send_echoes_and_snapshots_history() {
        let mut session = ChatSession::default();
        let turn = session.begin_send("  who are you  ").unwrap();

        assert_eq!(turn.message, "  who are you  ");
        assert_eq!(turn.history.len(), 1);
        assert_eq!(turn.history[0].role, "model");
        assert_eq!(turn.history[0].parts[0].text, INITIAL_CHAT_MESSAGE);

        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.text, "  who are you  ");
        assert!(session.is_loading());
    }

    #[test]
    fn second_send_while_loading_is_rejected() {
        let mut session = ChatSession::default();
        assert!(session.begin_send("one").is_some());
        assert!(session.begin_send("two").is_none());
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn complete_appends_reply_and_unlocks() {
        let mut session = ChatSession::default();
        session.begin_send("hi").unwrap();
        session.complete("hello");
        assert!(!session.is_loading());
        let texts: Vec<_> = session.transcript().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![INITIAL_CHAT_MESSAGE, "hi", "hello"]);

        let turn = session.begin_send("again").unwrap();
        assert_eq!(turn.history.len(), 3);
    }

    #[test]
    fn abandon_unlocks_without_reply() {
        let mut session = ChatSession::default();
        session.begin_send("hi").unwrap();
        session.abandon();
        assert!(!session.is_loading());
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript().last().unwrap().role, Role::User);
    }
}
