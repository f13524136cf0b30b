use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec, register_gauge,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("chat_requests_total", "Total number of chat requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("chat_rate_limited_total", "Chat requests rejected by the rate limiter")
            .unwrap();
    pub static ref ERRORS_TOTAL: CounterVec = register_counter_vec!(
        "chat_errors_total",
        "Chat error responses by error tag",
        &["kind"]
    )
    .unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "chat_upstream_latency_seconds",
        "Upstream completion latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("chat_tracked_clients", "Clients currently held by the rate limiter")
            .unwrap();
}
