//! Conversation Memory
//!
//! Information Hiding:
//! - Backing vector hidden; callers can only append or read a snapshot
//! - Lives only as long as the session that owns it

use crate::core::llm::{ChatMessage, Role};

/// Append-only, ordered log of the conversation.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(prompt: impl Into<String>) -> Self {
        let mut memory = Self::new();
        memory.append(Role::System, prompt);
        memory
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        let message = ChatMessage::new(role, content);
        tracing::trace!(
            "[ConversationMemory] #{} {:?} ({} bytes)",
            self.messages.len(),
            message.role,
            message.content.len()
        );
        self.messages.push(message);
    }

    /// Everything said so far, in order
    pub fn snapshot(&self) -> &[ChatMessage] {
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
}
