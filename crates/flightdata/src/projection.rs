use flightdesk_core::{FlightRecord, ProviderError, UNKNOWN_FIELD};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::aerodatabox::PROVIDER;

static LOCAL_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2})").expect("valid timestamp regex")
});

/// Parses a 200 response body. An empty or non-array body is a valid answer
/// meaning "no data for this flight"; an unparsable body is an error.
pub fn parse_flight_response(flight_number: &str, body: &str) -> Result<FlightRecord, ProviderError> {
    let payload: Value = serde_json::from_str(body).map_err(|err| ProviderError::Malformed {
        provider: PROVIDER,
        message: err.to_string(),
    })?;

    match payload.as_array().and_then(|flights| flights.first()) {
        Some(flight) => Ok(project_flight(flight_number, flight)),
        None => Ok(FlightRecord::unavailable(flight_number)),
    }
}

pub fn project_flight(flight_number: &str, flight: &Value) -> FlightRecord {
    let departure = flight.get("departure");
    let arrival = flight.get("arrival");

    let departure_time = departure
        .and_then(|value| value.get("scheduledTime"))
        .and_then(scheduled_time_text)
        .map(format_departure_time)
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

    FlightRecord {
        flight_number: flight_number.to_string(),
        departure_time,
        departure_airport: Some(text_at(departure, &["airport", "name"])),
        destination: text_at(arrival, &["airport", "name"]),
        status: text_at(Some(flight), &["status"]),
        aircraft: Some(text_at(flight.get("aircraft"), &["model"])),
        error: None,
    }
}

/// Drops seconds and zone offsets from `YYYY-MM-DD HH:MM...` timestamps;
/// anything else passes through untouched.
pub fn format_departure_time(raw: &str) -> String {
    match LOCAL_TIMESTAMP.captures(raw) {
        Some(captures) => format!("{} {}", &captures[1], &captures[2]),
        None => raw.to_string(),
    }
}

fn scheduled_time_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text.as_str()),
        Value::Object(_) => value
            .get("local")
            .and_then(Value::as_str)
            .or_else(|| value.get("utc").and_then(Value::as_str)),
        _ => None,
    }
}

fn text_at(root: Option<&Value>, path: &[&str]) -> String {
    root.and_then(|node| path.iter().try_fold(node, |node, key| node.get(key)))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}
