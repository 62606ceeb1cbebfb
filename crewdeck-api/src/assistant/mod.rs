/// Chat assistant backends
///
/// The assistant is a chat participant that replies when mentioned in a
/// project's chat. The [`CompletionModel`] trait abstracts over the actual
/// completion backend so the HTTP client can be swapped for a canned
/// implementation in tests and in deployments with no model configured.
///
/// Assistant replies are stored like any other message but with a NULL
/// author, which is how clients tell them apart.

pub mod http;
pub mod mock;
pub mod persona;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Handle the assistant listens for in chat, without the leading '@'
pub const ASSISTANT_HANDLE: &str = "crew";

/// Error type for assistant operations
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Completion request failed
    #[error("Completion request failed: {0}")]
    RequestFailed(String),

    /// Completion endpoint returned an unusable response
    #[error("Bad completion response: {0}")]
    BadResponse(String),
}

/// Who said a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona instructions
    System,

    /// A human team member
    User,

    /// The assistant itself
    Assistant,
}

/// One turn of the conversation sent to the completion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker
    pub role: Role,

    /// Message text
    pub content: String,
}

impl ChatTurn {
    /// Builds a turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A chat completion backend
///
/// Implementations must be cheap to share behind an `Arc` across request
/// handlers.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Produces the assistant's reply to a conversation
    ///
    /// `turns` is the conversation window, oldest first, with the persona
    /// as the first turn.
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, AssistantError>;
}

/// True when the message text mentions the assistant
///
/// Matching is case-insensitive on `@crew` and requires the handle to end
/// at a word boundary so `@crewmate` does not trigger a reply.
pub fn mentions_assistant(body: &str) -> bool {
    let lower = body.to_lowercase();
    let needle = format!("@{}", ASSISTANT_HANDLE);

    let mut search_from = 0;
    while let Some(pos) = lower[search_from..].find(&needle) {
        let end = search_from + pos + needle.len();
        let boundary = lower[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric() && c != '_');
        if boundary {
            return true;
        }
        search_from = end;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_assistant() {
        assert!(mentions_assistant("@crew can you look at this?"));
        assert!(mentions_assistant("hey @crew"));
        assert!(mentions_assistant("hey @CREW, thoughts?"));
        assert!(mentions_assistant("ping @crew."));
    }

    #[test]
    fn test_plain_text_does_not_mention() {
        assert!(!mentions_assistant("the crew is on it"));
        assert!(!mentions_assistant("no mention here"));
        assert!(!mentions_assistant(""));
    }

    #[test]
    fn test_longer_handle_does_not_mention() {
        assert!(!mentions_assistant("@crewmate hello"));
        assert!(!mentions_assistant("@crews"));
    }

    #[test]
    fn test_chat_turn_serializes_role_lowercase() {
        let turn = ChatTurn::new(Role::Assistant, "done");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "done");
    }
}
