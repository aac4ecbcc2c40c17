//! # Configuration Management
//!
//! Environment-driven configuration for the Atrium control plane.

mod settings;

pub use settings::{
    AppConfig, AuthConfig, DatabaseConfig, ObservabilityConfig, ServerConfig,
};
