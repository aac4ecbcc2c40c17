//! # Structured Logging
//!
//! Tracing subscriber initialization for the control plane. Log filtering is
//! driven by the observability configuration, overridable with `RUST_LOG`.

use crate::config::ObservabilityConfig;
use crate::errors::{AtriumError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; returns an error if a subscriber is
/// already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| AtriumError::config(format!("Invalid log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| AtriumError::config(format!("Failed to install subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_directive_is_rejected() {
        let config = ObservabilityConfig {
            log_level: "not a filter ===".to_string(),
            json_logs: false,
            service_name: "atrium".to_string(),
        };
        // Clear RUST_LOG influence: the fallback parse of the configured level
        // must fail for this input.
        if std::env::var("RUST_LOG").is_err() {
            assert!(init_tracing(&config).is_err());
        }
    }
}
