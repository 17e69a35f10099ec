use crate::models::FlightRecord;

pub fn compose_fallback_answer(record: &FlightRecord) -> String {
    let departure_text = match record.departure_airport.as_deref() {
        Some(airport) if !airport.is_empty() => format!(" from {airport}"),
        _ => String::new(),
    };

    format!(
        "Flight {} departs at {}{} to {}. Current status: {}.",
        record.flight_number,
        record.departure_time,
        departure_text,
        record.destination,
        record.status
    )
}
