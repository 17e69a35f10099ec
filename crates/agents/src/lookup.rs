use std::sync::Arc;

use flightdesk_core::{normalize_flight_number, FlightRecord, FlightTable};
use flightdesk_flightdata::FlightDataSource;
use flightdesk_observability::AppMetrics;
use tracing::{debug, warn};

/// Live lookup with the offline table as a safety net. A failed live call
/// is never retried.
pub struct FlightLookup<S> {
    source: S,
    table: FlightTable,
    metrics: Arc<AppMetrics>,
}

impl<S> FlightLookup<S>
where
    S: FlightDataSource,
{
    pub fn new(source: S, metrics: Arc<AppMetrics>) -> Self {
        Self {
            source,
            table: FlightTable::builtin().clone(),
            metrics,
        }
    }

    pub fn with_table(mut self, table: FlightTable) -> Self {
        self.table = table;
        self
    }

    pub async fn lookup(&self, flight_number: &str) -> Option<FlightRecord> {
        let flight_number = normalize_flight_number(flight_number);

        match self.source.fetch(&flight_number).await {
            Ok(record) => {
                self.metrics.inc_live_lookup();
                debug!(
                    flight_number = %flight_number,
                    source = self.source.source_name(),
                    has_error = record.has_error(),
                    "live flight lookup answered"
                );
                Some(record)
            }
            Err(error) => {
                self.metrics.inc_table_fallback();
                warn!(
                    flight_number = %flight_number,
                    source = self.source.source_name(),
                    kind = error.kind(),
                    error = %error,
                    "live flight lookup failed, using fallback table"
                );
                self.table.get(&flight_number).cloned()
            }
        }
    }
}
