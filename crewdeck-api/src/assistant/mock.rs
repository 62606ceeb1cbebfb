/// Canned completion backend
///
/// Used in tests and in deployments with no completion endpoint configured.
/// Replies are served from a fixed script, cycling back to the start when
/// exhausted, and every conversation passed in is recorded for assertions.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{AssistantError, ChatTurn, CompletionModel};

/// Scripted completion backend
pub struct MockCompletionModel {
    replies: Vec<String>,
    next: Mutex<usize>,
    calls: Mutex<Vec<Vec<ChatTurn>>>,
}

impl MockCompletionModel {
    /// Creates a backend that always replies with a generic acknowledgement
    pub fn new() -> Self {
        Self::with_replies(vec!["on it, give me a sec".to_string()])
    }

    /// Creates a backend that serves `replies` in order, cycling
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies,
            next: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Conversations passed to `complete` so far
    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, AssistantError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(turns.to_vec());

        if self.replies.is_empty() {
            return Err(AssistantError::BadResponse("No scripted reply".to_string()));
        }

        let mut next = self
            .next
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let reply = self.replies[*next % self.replies.len()].clone();
        *next += 1;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Role;

    #[tokio::test]
    async fn test_replies_cycle_in_order() {
        let model = MockCompletionModel::with_replies(vec![
            "first".to_string(),
            "second".to_string(),
        ]);
        let turns = vec![ChatTurn::new(Role::User, "hi")];

        assert_eq!(model.complete(&turns).await.unwrap(), "first");
        assert_eq!(model.complete(&turns).await.unwrap(), "second");
        assert_eq!(model.complete(&turns).await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_records_conversations() {
        let model = MockCompletionModel::new();
        let turns = vec![
            ChatTurn::new(Role::System, "persona"),
            ChatTurn::new(Role::User, "@crew hello"),
        ];

        model.complete(&turns).await.unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[0][1].content, "@crew hello");
    }
}
