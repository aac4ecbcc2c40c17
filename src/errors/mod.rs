//! # Error Handling
//!
//! Error handling for the Atrium control plane.

mod types;

pub use types::{AtriumError, Result};
