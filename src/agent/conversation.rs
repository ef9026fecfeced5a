//! Conversation history management
//!
//! History is append-only: messages are never reordered or removed. Starting
//! over means starting a new conversation.

use crate::core::Message;

/// Ordered chat history for one conversation
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a new conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user message
    pub fn add_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append the messages a graph run produced beyond what we already hold.
    ///
    /// `run` must extend the current history; anything else is ignored.
    pub fn absorb(&mut self, run: Vec<Message>) {
        if run.len() > self.messages.len() && run[..self.messages.len()] == self.messages[..] {
            self.messages
                .extend(run.into_iter().skip(self.messages.len()));
        } else {
            tracing::warn!("graph output does not extend the conversation; ignoring it");
        }
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the most recent message
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Get the last user message
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user())
    }

    /// Get the last assistant message
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
