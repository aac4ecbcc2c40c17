//! # Metrics Collection
//!
//! Counter instrumentation for authentication and gateway outcomes. The
//! `metrics` facade is a no-op until an exporter installs a recorder, so
//! these calls are safe in every build.

use metrics::counter;

/// Record the outcome of a session resolution attempt.
///
/// Outcomes: `authenticated`, `anonymous`, `malformed`, `not_found`,
/// `expired`, `error`.
pub fn record_session_resolution(outcome: &'static str) {
    counter!("session_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record a gateway pipeline decision for an operation.
pub fn record_gateway_decision(resource: &'static str, action: &'static str, outcome: &'static str) {
    counter!(
        "gateway_decisions_total",
        "resource" => resource,
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}
