//! Message types for chat-completion requests.

use serde::{Deserialize, Serialize};

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A single completion call: an ordered message list plus sampling knobs.
///
/// The model identifier is the backend's concern; callers only pick the
/// temperature for the call at hand (greetings run slightly hotter than
/// ongoing chat).
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Messages in the conversation, system directive first.
    pub messages: Vec<ChatMessage>,
    /// Temperature for generation.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request from messages at the given temperature.
    pub fn new(messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            messages,
            temperature,
        }
    }

    /// The concatenated content of all messages, for assertions and logging.
    pub fn joined_content(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").role, "assistant");
    }

    #[test]
    fn test_joined_content() {
        let request = CompletionRequest::new(
            vec![ChatMessage::system("one"), ChatMessage::user("two")],
            0.7,
        );
        assert_eq!(request.joined_content(), "one\ntwo");
    }
}
