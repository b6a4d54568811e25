//! Mock chat backend for testing
//!
//! Returns a canned reply that echoes the last user message, so tests can
//! assert the proxy path end to end without a running LLM server.

use async_trait::async_trait;

use crate::error::Result;

use super::{ChatBackend, ChatMessage};

/// Mock chat backend.
#[derive(Clone)]
pub struct MockChat {
    /// Whether health_check should report healthy.
    pub healthy: bool,
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChat {
    /// Create a new mock backend (healthy by default).
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create an unhealthy mock backend.
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(format!("[mock reply] {}", last_user))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_last_user_message() {
        let backend = MockChat::new();
        let reply = backend
            .chat(&[
                ChatMessage::system("you are helpful"),
                ChatMessage::user("first"),
                ChatMessage::assistant("ok"),
                ChatMessage::user("how is cashflow?"),
            ])
            .await
            .unwrap();
        assert_eq!(reply, "[mock reply] how is cashflow?");
    }

    #[tokio::test]
    async fn test_unhealthy_mock() {
        assert!(!MockChat::unhealthy().health_check().await);
    }
}
