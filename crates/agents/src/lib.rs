mod composer;
mod extractor;
mod lookup;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use flightdesk_core::{normalize_text, AppConfig, Answer, FlightRecord, FlightTable, HttpConfig};
use flightdesk_flightdata::{AeroDataBoxClient, FlightDataSource};
use flightdesk_llm::{ChatModel, GroqChatModel};
use flightdesk_observability::AppMetrics;
use reqwest::Client;
use tracing::{info, instrument};
use uuid::Uuid;

pub use composer::{ResponseComposer, COMPOSER_PROMPT};
pub use extractor::{
    interpret_model_identifier, ExtractionStrategy, IdentifierExtractor, EXTRACTION_PROMPT,
};
pub use lookup::FlightLookup;

pub type LiveFlightAgent = FlightAgent<GroqChatModel, AeroDataBoxClient>;

/// One question in, one answer out: extract, look up, compose. Nothing is
/// carried from one call to the next.
pub struct FlightAgent<M, S> {
    extractor: IdentifierExtractor<M>,
    lookup: FlightLookup<S>,
    composer: ResponseComposer<M>,
    metrics: Arc<AppMetrics>,
}

impl<M, S> FlightAgent<M, S>
where
    M: ChatModel,
    S: FlightDataSource,
{
    pub fn new(model: M, source: S, min_answer_chars: usize, metrics: Arc<AppMetrics>) -> Self {
        let model = Arc::new(model);
        Self {
            extractor: IdentifierExtractor::new(model.clone(), metrics.clone()),
            lookup: FlightLookup::new(source, metrics.clone()),
            composer: ResponseComposer::new(model, min_answer_chars, metrics.clone()),
            metrics,
        }
    }

    pub fn with_table(mut self, table: FlightTable) -> Self {
        self.lookup = self.lookup.with_table(table);
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<ExtractionStrategy>) -> Self {
        self.extractor = self.extractor.with_strategies(strategies);
        self
    }

    #[instrument(skip(self, query), fields(query_id = %Uuid::new_v4()))]
    pub async fn answer(&self, query: &str) -> Answer {
        let started = Instant::now();
        self.metrics.inc_query();

        let query = normalize_text(query);
        let (answer, outcome) = self.run_pipeline(&query).await;

        self.metrics.observe_latency(started.elapsed());
        info!(
            outcome,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "flight query answered"
        );
        answer
    }

    /// Direct record access without phrasing.
    pub async fn flight_info(&self, flight_number: &str) -> Option<FlightRecord> {
        self.lookup.lookup(flight_number).await
    }

    async fn run_pipeline(&self, query: &str) -> (Answer, &'static str) {
        let Some(flight_number) = self.extractor.extract(query).await else {
            return (Answer::no_identifier(), "no_identifier");
        };

        let record = match self.lookup.lookup(&flight_number).await {
            Some(record) if !record.has_error() => record,
            _ => {
                self.metrics.inc_not_found();
                return (Answer::not_found(&flight_number), "not_found");
            }
        };

        (Answer::new(self.composer.compose(&record).await), "answered")
    }
}

impl LiveFlightAgent {
    pub fn from_config(config: &AppConfig, metrics: Arc<AppMetrics>) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        let model = GroqChatModel::new(&config.llm, client.clone());
        let source = AeroDataBoxClient::new(&config.flight_data, client);

        Ok(Self::new(model, source, config.min_answer_chars, metrics))
    }
}

pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .user_agent(concat!("flightdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")
}
