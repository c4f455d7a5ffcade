//! Conversation message types.

use crate::affect::EmotionalState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single message in a session's conversation history.
///
/// Messages are append-only and owned exclusively by their session.
/// User messages always carry an emotional reading; assistant messages
/// never do. The recording API on `Session` enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The message text
    pub content: String,
    /// True when the message was authored by the user
    pub is_user: bool,
    /// When the message was recorded
    pub timestamp: DateTime<Utc>,
    /// Emotional reading, present only for user messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<EmotionalState>,
}

impl Message {
    /// Creates a user message with its emotional reading.
    pub fn from_user(content: impl Into<String>, state: EmotionalState) -> Self {
        Self {
            content: content.into(),
            is_user: true,
            timestamp: Utc::now(),
            emotional_state: Some(state),
        }
    }

    /// Creates an assistant message.
    pub fn from_assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_user: false,
            timestamp: Utc::now(),
            emotional_state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affect::EmotionalState;

    #[test]
    fn test_user_message_carries_state() {
        let message = Message::from_user("hello", EmotionalState::neutral());
        assert!(message.is_user);
        assert!(message.emotional_state.is_some());
    }

    #[test]
    fn test_assistant_message_has_no_state() {
        let message = Message::from_assistant("I'm here to listen");
        assert!(!message.is_user);
        assert!(message.emotional_state.is_none());
    }
}
