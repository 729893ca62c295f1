//! Conversation transcript for a single triage run

use crate::llm::{Message, MessageRole};

/// Ordered conversation history, system prompt first.
///
/// Grows append-only; one transcript lives exactly as long as its run
/// and is returned with the result for inspection.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Tool-call ids that have a result recorded, in dispatch order
    pub fn tool_result_ids(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|msg| msg.role == MessageRole::Tool)
            .filter_map(|msg| msg.tool_call_id.as_deref())
            .collect()
    }
}
