//! Prometheus metrics for workshop-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};
use workshop_core::middleware::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "workshop_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Service order counter by outcome.
pub static ORDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "workshop_service_orders_total",
        "Total number of service order operations",
        &["operation", "status"] // create/delete x ok/error
    )
    .expect("Failed to register service_orders_total")
});

/// Stock movement counter by direction.
pub static STOCK_MOVEMENTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "workshop_stock_movements_total",
        "Total number of stock ledger mutations",
        &["direction"] // reserve, release
    )
    .expect("Failed to register stock_movements_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "workshop_errors_total",
        "Total number of errors by type",
        &["error_type"] // insufficient_stock
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&ORDERS_TOTAL);
    Lazy::force(&STOCK_MOVEMENTS);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
