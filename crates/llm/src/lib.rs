mod groq;

use flightdesk_core::ProviderError;
use serde::Serialize;

pub use groq::{extract_completion_text, GroqChatModel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
            max_tokens: 64,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A single-turn chat completion backend.
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Sends one system + user exchange and returns the raw completion text.
    /// Each call is attempted exactly once.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError>;
}
