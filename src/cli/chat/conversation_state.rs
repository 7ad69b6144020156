use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ChatError;

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry. Content is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    error: bool,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, ChatError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        Ok(Self {
            role,
            content,
            timestamp: Utc::now(),
            error: false,
        })
    }

    pub fn user(content: impl Into<String>) -> Result<Self, ChatError> {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, ChatError> {
        Self::new(Role::Assistant, content)
    }

    /// An assistant entry reporting that no reply could be produced.
    pub fn assistant_error(content: impl Into<String>) -> Result<Self, ChatError> {
        let mut message = Self::new(Role::Assistant, content)?;
        message.error = true;
        Ok(message)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// Coarse state of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    AwaitingResponse,
}

/// Session-scoped conversation state.
///
/// Only the controller mutates it; everyone else gets `&ConversationState`
/// or a [`ConversationSnapshot`].
#[derive(Debug, Default)]
pub struct ConversationState {
    transcript: Vec<Message>,
    pending_input: String,
    awaiting_response: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn phase(&self) -> Phase {
        if self.awaiting_response {
            Phase::AwaitingResponse
        } else {
            Phase::Idle
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            transcript: self.transcript.clone(),
            pending_input: self.pending_input.clone(),
            awaiting_response: self.awaiting_response,
            phase: self.phase(),
        }
    }

    pub(super) fn set_pending_input(&mut self, text: String) {
        self.pending_input = text;
    }

    /// Moves the pending input into the transcript as a user message.
    ///
    /// Returns the submitted text, or `None` (leaving everything untouched)
    /// when the trimmed input is empty.
    pub(super) fn begin_turn(&mut self) -> Option<String> {
        let message = Message::user(self.pending_input.trim()).ok()?;
        let query = message.content().to_string();

        self.transcript.push(message);
        self.pending_input.clear();
        self.awaiting_response = true;

        Some(query)
    }

    /// Closes the current turn, appending `reply` when there is one.
    pub(super) fn finish_turn(&mut self, reply: Option<Message>) {
        if let Some(message) = reply {
            self.transcript.push(message);
        }
        self.awaiting_response = false;
    }
}

/// Owned, read-only copy of [`ConversationState`] handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSnapshot {
    pub transcript: Vec<Message>,
    pub pending_input: String,
    pub awaiting_response: bool,
    pub phase: Phase,
}
