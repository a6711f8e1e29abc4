use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use std::sync::LazyLock;

pub static REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "market_requests_total",
        "Total envelope responses by endpoint and outcome",
        &["endpoint", "outcome"]
    )
    .expect("market_requests_total registers once")
});

pub static CHARGES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "market_charges_total",
        "Usage charges by final status",
        &["status"]
    )
    .expect("market_charges_total registers once")
});

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Force registration so every family shows up in the first scrape.
pub fn register_metrics() {
    LazyLock::force(&REQUESTS);
    LazyLock::force(&CHARGES);
}
