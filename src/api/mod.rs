//! # REST API Components
//!
//! HTTP routing, error mapping, and request handlers for the Atrium
//! control plane.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use routes::{build_router, ApiState};
