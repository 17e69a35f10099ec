use flightdesk_core::{FlightDataConfig, FlightRecord, ProviderError};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::projection::parse_flight_response;
use crate::FlightDataSource;

pub(crate) const PROVIDER: &str = "aerodatabox";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// AeroDataBox flight-status lookups through RapidAPI.
#[derive(Debug, Clone)]
pub struct AeroDataBoxClient {
    client: Client,
    api_key: String,
    host: String,
    base_url: String,
}

impl AeroDataBoxClient {
    pub fn new(config: &FlightDataConfig, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            host: config.host.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The flight number is pushed as a single encoded path segment, so it
    /// can never add query parameters or change the path.
    pub fn flight_url(&self, flight_number: &str) -> Result<Url, ProviderError> {
        let invalid_base = |message: String| ProviderError::Transport {
            provider: PROVIDER,
            message,
        };

        let mut url = Url::parse(&self.base_url)
            .map_err(|err| invalid_base(format!("invalid base url {}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| invalid_base(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["flights", "number", flight_number]);
        url.query_pairs_mut()
            .clear()
            .append_pair("withAircraftImage", "false")
            .append_pair("withLocation", "false");
        Ok(url)
    }
}

impl FlightDataSource for AeroDataBoxClient {
    fn source_name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, flight_number: &str) -> Result<FlightRecord, ProviderError> {
        let response = self
            .client
            .get(self.flight_url(flight_number)?)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .map_err(|err| ProviderError::Transport {
                provider: PROVIDER,
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| ProviderError::Transport {
            provider: PROVIDER,
            message: err.to_string(),
        })?;

        if status != StatusCode::OK {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        debug!(flight_number, bytes = body.len(), "aerodatabox response received");
        parse_flight_response(flight_number, &body)
    }
}
