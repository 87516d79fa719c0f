//! Engine metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Catalog fetch from the market-data collaborator
    CatalogFetch,
    /// Scoring, search and ranking for one run
    Generation,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Catalog records that could not be turned into legs
    LegsRejected,
    /// Legs that passed validation and the edge floor
    LegsScored,
    /// Legs dropped for bad prices or thin edge
    LegsSkipped,
    /// Candidate leg sets examined by the search
    CandidatesEvaluated,
    /// Searches cut short by the work cap
    SearchTruncated,
    /// Combinations returned to the caller
    ParlaysEmitted,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::CatalogFetch => "parlay_edge_catalog_fetch_latency_ms",
            LatencyMetric::Generation => "parlay_edge_generation_latency_ms",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::LegsRejected => "parlay_edge_legs_rejected_total",
            CounterMetric::LegsScored => "parlay_edge_legs_scored_total",
            CounterMetric::LegsSkipped => "parlay_edge_legs_skipped_total",
            CounterMetric::CandidatesEvaluated => "parlay_edge_candidates_evaluated_total",
            CounterMetric::SearchTruncated => "parlay_edge_search_truncated_total",
            CounterMetric::ParlaysEmitted => "parlay_edge_parlays_emitted_total",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let millis = duration.as_secs_f64() * 1000.0;
    ::metrics::histogram!(metric.name()).record(millis);
    tracing::trace!(metric = metric.name(), value_ms = millis, "Recorded latency");
}

/// Increment a counter
pub fn increment(metric: CounterMetric, value: u64) {
    if value == 0 {
        return;
    }
    ::metrics::counter!(metric.name()).increment(value);
}
