//! # Observability Infrastructure
//!
//! Structured logging and metrics counters for the Atrium control plane.

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
