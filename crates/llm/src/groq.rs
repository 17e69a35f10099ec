use flightdesk_core::{LlmConfig, ProviderError};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::{ChatModel, ChatRequest};

const PROVIDER: &str = "groq";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Groq's OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct GroqChatModel {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqChatModel {
    pub fn new(config: &LlmConfig, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        }
    }

    fn payload(&self, request: &ChatRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }
}

impl ChatModel for GroqChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|err| ProviderError::Transport {
                provider: PROVIDER,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed {
                provider: PROVIDER,
                message: err.to_string(),
            })?;

        if let Some(message) = body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
        {
            return Err(ProviderError::Model {
                provider: PROVIDER,
                message: message.to_string(),
            });
        }

        let text = extract_completion_text(&body).ok_or_else(|| ProviderError::Malformed {
            provider: PROVIDER,
            message: "completion text missing".to_string(),
        })?;
        debug!(model = %self.model, chars = text.chars().count(), "groq completion received");
        Ok(text)
    }
}

pub fn extract_completion_text(body: &Value) -> Option<String> {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}
