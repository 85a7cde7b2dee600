//! Append-only chat transcript.
//!
//! Insertion order is display order is conversation order. Messages are never
//! edited or removed; the only mutation is `push`.

use serde::{Deserialize, Serialize};

pub const INITIAL_CHAT_MESSAGE: &str = "Greetings, traveler. I am the digital echo of CasTo. Ready to ascend? Ask me anything about the episodes or your own cosmic blocks.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sequence number rendered as a string; unique and increasing per transcript.
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// One turn in the shape the chat API expects: `{role, parts: [{text}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub parts: Vec<HistoryPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPart {
    pub text: String,
}

impl HistoryEntry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role: role.as_str().to_string(),
            parts: vec![HistoryPart { text: text.into() }],
        }
    }
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(msg: &ChatMessage) -> Self {
        Self::new(msg.role, msg.text.clone())
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_seq: u64,
}

impl Transcript {
    /// A transcript seeded with one model-authored greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_seq: 0,
        };
        transcript.push(Role::Model, greeting);
        transcript
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) -> &ChatMessage {
        let msg = ChatMessage {
            id: self.next_seq.to_string(),
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.next_seq += 1;
        self.messages.push(msg);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Most recent model reply, if any (the greeting counts).
    pub fn last_model_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Model)
            .map(|m| m.text.as_str())
    }

    /// The whole transcript in outbound role/parts form.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(HistoryEntry::from).collect()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(INITIAL_CHAT_MESSAGE)
    }
}
