use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all catalog metrics
const PREFIX: &str = "similarity_catalog";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Similarity Metrics
    pub static ref SIMILARITY_QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_similarity_queries_total"), "Total similarity queries"),
        &["operation", "outcome"]
    ).expect("Failed to create similarity_queries_total metric");

    pub static ref SIMILARITY_QUERY_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_similarity_query_duration_seconds"),
            "Similarity query duration in seconds, enrichment included"
        )
        .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0]),
        &["operation"]
    ).expect("Failed to create similarity_query_duration_seconds metric");

    // Enrichment Metrics
    pub static ref ENRICHMENT_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_enrichment_lookups_total"), "Enrichment lookups by outcome"),
        &["gateway", "outcome"]
    ).expect("Failed to create enrichment_lookups_total metric");

    // Dataset Metrics
    pub static ref DATASET_TRACKS: Gauge = Gauge::new(
        format!("{PREFIX}_dataset_tracks"),
        "Number of tracks in the last loaded dataset"
    ).expect("Failed to create dataset_tracks metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(SIMILARITY_QUERIES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(SIMILARITY_QUERY_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(ENRICHMENT_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(DATASET_TRACKS.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a similarity service operation
pub fn record_similarity_query(operation: &str, outcome: &str, duration: Duration) {
    SIMILARITY_QUERIES_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();

    SIMILARITY_QUERY_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of a single enrichment lookup
pub fn record_enrichment(gateway: &str, outcome: &str) {
    ENRICHMENT_LOOKUPS_TOTAL
        .with_label_values(&[gateway, outcome])
        .inc();
}

pub fn set_dataset_size(count: usize) {
    DATASET_TRACKS.set(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
