//! Metrics emission.
//!
//! # Metrics
//! - `textmorph_api_calls_total` (counter): upstream API calls by service, status
//! - `textmorph_api_call_duration_seconds` (histogram): API call latency by service
//! - `textmorph_operation_duration_seconds` (histogram): timed operations by name
//!
//! # Design Decisions
//! - Emission goes through the `metrics` facade; with no recorder installed
//!   every call is a no-op
//! - Fed by the structured logging helpers, never called directly by sinks

use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_api_call(service: &str, status: &str, duration: Option<Duration>) {
    counter!(
        "textmorph_api_calls_total",
        "service" => service.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    if let Some(duration) = duration {
        histogram!(
            "textmorph_api_call_duration_seconds",
            "service" => service.to_string()
        )
        .record(duration.as_secs_f64());
    }
}

pub fn record_operation(operation: &str, duration: Duration) {
    histogram!(
        "textmorph_operation_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}
