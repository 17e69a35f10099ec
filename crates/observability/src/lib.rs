use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    queries_total: AtomicU64,
    live_lookups_total: AtomicU64,
    table_fallback_total: AtomicU64,
    extraction_fallback_total: AtomicU64,
    template_fallback_total: AtomicU64,
    not_found_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub live_lookups_total: u64,
    pub table_fallback_total: u64,
    pub extraction_fallback_total: u64,
    pub template_fallback_total: u64,
    pub not_found_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_query(&self) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flightdesk_queries_total").increment(1);
    }

    pub fn inc_live_lookup(&self) {
        self.live_lookups_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flightdesk_live_lookups_total").increment(1);
    }

    pub fn inc_table_fallback(&self) {
        self.table_fallback_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flightdesk_fallback_total", "path" => "table").increment(1);
    }

    pub fn inc_extraction_fallback(&self) {
        self.extraction_fallback_total
            .fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flightdesk_fallback_total", "path" => "extraction").increment(1);
    }

    pub fn inc_template_fallback(&self) {
        self.template_fallback_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flightdesk_fallback_total", "path" => "template").increment(1);
    }

    pub fn inc_not_found(&self) {
        self.not_found_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flightdesk_not_found_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            queries_total: queries,
            live_lookups_total: self.live_lookups_total.load(Ordering::Relaxed),
            table_fallback_total: self.table_fallback_total.load(Ordering::Relaxed),
            extraction_fallback_total: self.extraction_fallback_total.load(Ordering::Relaxed),
            template_fallback_total: self.template_fallback_total.load(Ordering::Relaxed),
            not_found_total: self.not_found_total.load(Ordering::Relaxed),
            avg_latency_millis: if queries == 0 {
                0.0
            } else {
                latency as f64 / queries as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,flightdesk_agents=info,flightdesk_api=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
