//! Pluggable AI chat backend abstraction
//!
//! The assistant answers free-form questions about the business. Backends
//! implement [`ChatBackend`]; [`ChatClient`] is the concrete enum wrapper
//! providing Clone and compile-time dispatch.
//!
//! # Configuration
//!
//! Environment variables:
//! - `SMARTFIN_AI_BACKEND`: Backend to use (`ollama`, `mock`). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for the ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod context;
mod mock;
mod ollama;

pub use context::business_context;
pub use mock::MockChat;
pub use ollama::OllamaChat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One turn of a chat conversation, in the role/content shape every chat
/// API speaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Interface every chat backend implements.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a conversation and get the assistant's reply.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Model name (for logging and the health endpoint).
    fn model(&self) -> &str;

    /// Host URL (for logging).
    fn host(&self) -> &str;
}

/// Concrete chat client enum.
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ChatClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaChat),
    /// Mock backend for tests and offline development
    Mock(MockChat),
}

impl ChatClient {
    /// Create a chat client from environment variables.
    ///
    /// Returns None when the selected backend is not configured; the chat
    /// feature is simply absent in that case, everything else keeps working.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("SMARTFIN_AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaChat::from_env().map(ChatClient::Ollama),
            "mock" => Some(ChatClient::Mock(MockChat::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown SMARTFIN_AI_BACKEND, falling back to ollama");
                OllamaChat::from_env().map(ChatClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly.
    pub fn ollama(host: &str, model: &str) -> Self {
        ChatClient::Ollama(OllamaChat::new(host, model))
    }

    /// Create a mock backend for testing.
    pub fn mock() -> Self {
        ChatClient::Mock(MockChat::new())
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        match self {
            ChatClient::Ollama(b) => b.chat(messages).await,
            ChatClient::Mock(b) => b.chat(messages).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ChatClient::Ollama(b) => b.health_check().await,
            ChatClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ChatClient::Ollama(b) => b.model(),
            ChatClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            ChatClient::Ollama(b) => b.host(),
            ChatClient::Mock(b) => b.host(),
        }
    }
}
