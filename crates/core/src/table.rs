use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::FlightRecord;

static BUILTIN: Lazy<FlightTable> = Lazy::new(|| {
    FlightTable::from_records(vec![
        FlightRecord::new("AI123", "08:00 AM", "Delhi", "Delayed"),
        FlightRecord::new("BA456", "10:15 AM", "London", "On Time"),
        FlightRecord::new("DL789", "02:30 PM", "New York", "Boarding"),
        FlightRecord::new("EK101", "11:45 PM", "Dubai", "Scheduled"),
        FlightRecord::new("EI525", "10:30 AM", "Dublin", "On Time"),
        FlightRecord::new("UAE42X", "12:46 PM", "Dubai", "Departed"),
        FlightRecord::new("DL47", "10:05 AM", "New York John F Kennedy", "Departed"),
    ])
});

/// Offline flight data consulted when the live provider cannot be reached.
#[derive(Debug, Clone, Default)]
pub struct FlightTable {
    records: HashMap<String, FlightRecord>,
}

impl FlightTable {
    pub fn builtin() -> &'static FlightTable {
        &BUILTIN
    }

    pub fn from_records(records: Vec<FlightRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.flight_number.clone(), record))
                .collect(),
        }
    }

    pub fn get(&self, flight_number: &str) -> Option<&FlightRecord> {
        self.records.get(flight_number)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn flight_numbers(&self) -> Vec<&str> {
        let mut numbers = self.records.keys().map(String::as_str).collect::<Vec<_>>();
        numbers.sort_unstable();
        numbers
    }
}
