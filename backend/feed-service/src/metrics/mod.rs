//! Prometheus metrics for feed-service.
//!
//! Exposes HTTP and feed collectors plus the handler for `/metrics`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Duration;

pub mod feed;

lazy_static! {
    static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_service_http_requests_total",
        "HTTP requests handled by feed-service",
        &["method", "path", "status"]
    )
    .expect("failed to register feed_service_http_requests_total");

    static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_service_http_request_duration_seconds",
        "HTTP request latency for feed-service",
        &["method", "path"]
    )
    .expect("failed to register feed_service_http_request_duration_seconds");
}

/// Record one finished HTTP request. `path` should be the route pattern.
pub fn observe_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(elapsed.as_secs_f64());
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
