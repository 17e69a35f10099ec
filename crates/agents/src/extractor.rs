use std::sync::Arc;

use flightdesk_core::{extract_flight_number_pattern, ProviderError};
use flightdesk_llm::{ChatModel, ChatRequest};
use flightdesk_observability::AppMetrics;
use tracing::{debug, warn};

pub const EXTRACTION_PROMPT: &str = "You are a flight information extraction assistant. Your only task is to extract the flight number from the user query. Return ONLY the flight number without any additional text. If no flight number is found, return \"NONE\".";

const NO_IDENTIFIER_TOKEN: &str = "NONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    LanguageModel,
    Pattern,
}

impl ExtractionStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LanguageModel => "language_model",
            Self::Pattern => "pattern",
        }
    }
}

/// Tries each strategy in order. The first one that produces an answer,
/// including "no flight number here", decides the outcome; a strategy only
/// hands over to the next one when its provider fails.
pub struct IdentifierExtractor<M> {
    model: Arc<M>,
    strategies: Vec<ExtractionStrategy>,
    metrics: Arc<AppMetrics>,
}

impl<M> IdentifierExtractor<M>
where
    M: ChatModel,
{
    pub fn new(model: Arc<M>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            model,
            strategies: vec![ExtractionStrategy::LanguageModel, ExtractionStrategy::Pattern],
            metrics,
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<ExtractionStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    pub async fn extract(&self, query: &str) -> Option<String> {
        for (position, strategy) in self.strategies.iter().copied().enumerate() {
            match self.run(strategy, query).await {
                Ok(outcome) => {
                    debug!(
                        strategy = strategy.as_str(),
                        found = outcome.is_some(),
                        "flight number extraction finished"
                    );
                    return outcome;
                }
                Err(error) => {
                    warn!(
                        strategy = strategy.as_str(),
                        model = self.model.model_name(),
                        kind = error.kind(),
                        error = %error,
                        "flight number extraction failed"
                    );
                    if position + 1 < self.strategies.len() {
                        self.metrics.inc_extraction_fallback();
                    }
                }
            }
        }

        None
    }

    async fn run(
        &self,
        strategy: ExtractionStrategy,
        query: &str,
    ) -> Result<Option<String>, ProviderError> {
        match strategy {
            ExtractionStrategy::LanguageModel => {
                let request = ChatRequest::new(
                    EXTRACTION_PROMPT,
                    format!("Extract the flight number from: '{query}'"),
                )
                .temperature(0.0)
                .max_tokens(10);
                let raw = self.model.complete(&request).await?;
                Ok(interpret_model_identifier(&raw))
            }
            ExtractionStrategy::Pattern => Ok(extract_flight_number_pattern(query)),
        }
    }
}

pub fn interpret_model_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_IDENTIFIER_TOKEN {
        None
    } else {
        Some(trimmed.to_string())
    }
}
