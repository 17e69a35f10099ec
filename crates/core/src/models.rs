use serde::{Deserialize, Serialize};

pub const UNKNOWN_FIELD: &str = "Unknown";
pub const NO_FLIGHT_DATA: &str = "No flight data available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub flight_number: String,
    #[serde(default = "unknown_field")]
    pub departure_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<String>,
    #[serde(default = "unknown_field")]
    pub destination: String,
    #[serde(default = "unknown_field")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlightRecord {
    pub fn new(
        flight_number: impl Into<String>,
        departure_time: impl Into<String>,
        destination: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            departure_time: departure_time.into(),
            departure_airport: None,
            destination: destination.into(),
            status: status.into(),
            aircraft: None,
            error: None,
        }
    }

    /// Record returned when the live provider answered but knew nothing
    /// about the flight.
    pub fn unavailable(flight_number: impl Into<String>) -> Self {
        Self {
            flight_number: flight_number.into(),
            departure_time: UNKNOWN_FIELD.to_string(),
            departure_airport: None,
            destination: UNKNOWN_FIELD.to_string(),
            status: UNKNOWN_FIELD.to_string(),
            aircraft: None,
            error: Some(NO_FLIGHT_DATA.to_string()),
        }
    }

    pub fn with_departure_airport(mut self, airport: impl Into<String>) -> Self {
        self.departure_airport = Some(airport.into());
        self
    }

    pub fn with_aircraft(mut self, aircraft: impl Into<String>) -> Self {
        self.aircraft = Some(aircraft.into());
        self
    }

    pub fn has_error(&self) -> bool {
        self.error
            .as_deref()
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn unknown_field() -> String {
    UNKNOWN_FIELD.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer")]
    pub text: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn no_identifier() -> Self {
        Self::new("Sorry, I couldn't identify a flight number in your query.")
    }

    pub fn not_found(flight_number: &str) -> Self {
        Self::new(format!("Flight {flight_number} not found in database."))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryInput {
    pub query: String,
}
