use std::sync::Arc;

use flightdesk_core::{compose_fallback_answer, FlightRecord};
use flightdesk_llm::{ChatModel, ChatRequest};
use flightdesk_observability::AppMetrics;
use tracing::{debug, warn};

pub const COMPOSER_PROMPT: &str = "You are a helpful flight information assistant. Format the response based on the flight data. Return ONLY the final answer text without any additional formatting or explanation. Make the response concise but informative, including all relevant flight details.";

pub struct ResponseComposer<M> {
    model: Arc<M>,
    min_answer_chars: usize,
    metrics: Arc<AppMetrics>,
}

impl<M> ResponseComposer<M>
where
    M: ChatModel,
{
    pub fn new(model: Arc<M>, min_answer_chars: usize, metrics: Arc<AppMetrics>) -> Self {
        Self {
            model,
            min_answer_chars,
            metrics,
        }
    }

    pub async fn compose(&self, record: &FlightRecord) -> String {
        let request = ChatRequest::new(
            COMPOSER_PROMPT,
            format!("Create a response for this flight data: {}", record.to_json()),
        )
        .temperature(0.2)
        .max_tokens(100);

        match self.model.complete(&request).await {
            Ok(text) => {
                let text = text.trim();
                if self.is_usable(text) {
                    return text.to_string();
                }
                debug!(
                    chars = text.chars().count(),
                    min_chars = self.min_answer_chars,
                    "model answer too short, using template"
                );
            }
            Err(error) => {
                warn!(
                    flight_number = %record.flight_number,
                    model = self.model.model_name(),
                    kind = error.kind(),
                    error = %error,
                    "answer generation failed, using template"
                );
            }
        }

        self.metrics.inc_template_fallback();
        compose_fallback_answer(record)
    }

    fn is_usable(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().count() >= self.min_answer_chars
    }
}
