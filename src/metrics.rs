use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

pub static ANALYZER_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "analyzer_requests_total",
        "Total number of analysis requests sent to the backend",
        &["client_id"]
    )
    .expect("register analyzer_requests_total")
});

pub static ANALYZER_OUTCOMES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "analyzer_outcomes_total",
        "Settled submissions by outcome",
        &["client_id", "outcome"]
    )
    .expect("register analyzer_outcomes_total")
});

pub static ANALYZER_STALE_RESPONSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "analyzer_stale_responses_total",
        "Responses discarded because a newer submission superseded them",
        &["client_id"]
    )
    .expect("register analyzer_stale_responses_total")
});

pub static ANALYZER_REQUEST_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "analyzer_request_latency_seconds",
        "Histogram of analysis request latency",
        &["client_id"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    )
    .expect("register analyzer_request_latency_seconds")
});

pub fn gather_metrics() -> String {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(err) = TextEncoder::new().encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %err, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
