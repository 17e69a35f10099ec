mod aerodatabox;
mod projection;

use flightdesk_core::{FlightRecord, ProviderError};

pub use aerodatabox::AeroDataBoxClient;
pub use projection::{format_departure_time, parse_flight_response, project_flight};

pub trait FlightDataSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Fetches live status for an already normalized flight number.
    ///
    /// `Ok` carries either a projected record or, when the provider knows
    /// nothing about the flight, a record with its error marker set. `Err`
    /// means the provider itself could not be used.
    async fn fetch(&self, flight_number: &str) -> Result<FlightRecord, ProviderError>;
}
