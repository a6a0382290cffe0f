use lazy_static::lazy_static;
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};

use crate::models::Direction;

lazy_static! {
    /// Feed pages served, by scan direction.
    pub static ref FEED_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_requests_total",
        "Feed pages served segmented by scan direction",
        &["direction"]
    )
    .expect("failed to register feed_requests_total");

    /// Gender-ratio reshape decisions for male viewers (applied/skipped).
    pub static ref FEED_RATIO_RESHAPE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_ratio_reshape_total",
        "Gender-ratio reshape decisions segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register feed_ratio_reshape_total");

    /// Resolved page size per request.
    pub static ref FEED_PAGE_SIZE: Histogram = register_histogram!(
        "feed_page_size",
        "Resolved feed page size",
        vec![1.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("failed to register feed_page_size");
}

pub fn record_page(direction: Direction, page_size: usize) {
    FEED_REQUESTS_TOTAL
        .with_label_values(&[direction.as_param()])
        .inc();
    FEED_PAGE_SIZE.observe(page_size as f64);
}

pub fn record_reshape(applied: bool) {
    let outcome = if applied { "applied" } else { "skipped" };
    FEED_RATIO_RESHAPE_TOTAL.with_label_values(&[outcome]).inc();
}
