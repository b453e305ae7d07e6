//! Conversation transcript owned by a single chat session.
//!
//! The transcript is an append-only sequence: insertion order is display
//! order, and only the trailing entry may be rewritten while it is the
//! assistant message still receiving deltas. Pushing a user message seals
//! whatever came before it.

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered message list with the append-only / last-entry-mutable rules
/// baked into its API. There is no `&mut` access to arbitrary entries.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a user message. Once it is in place the previous assistant
    /// message is no longer last and can never be rewritten again.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Fold the full running text of the in-progress assistant turn into
    /// the transcript: rewrite the trailing assistant entry if there is
    /// one, otherwise start a new entry seeded with `content`.
    pub fn apply_assistant(&mut self, content: &str) {
        match self.messages.last_mut() {
            Some(last) if last.sender == Sender::Assistant => {
                last.content.clear();
                last.content.push_str(content);
            }
            _ => self.messages.push(ChatMessage::assistant(content)),
        }
    }

    /// Append the terminal fallback entry for a failed turn. Partial
    /// content already folded in stays where it is.
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }
}
