//! Collaborators of the HTTP façade.
//!
//! # Services
//!
//! - `access` - Access-key verification (resolves a caller to a user ID)
//! - `metrics` - Prometheus failure counters injected into handlers

pub mod access;
pub mod metrics;

pub use access::{AccessError, AccessKeyRegistry};
pub use metrics::{ErrorCounters, MetricsSink, SERVER_ERROR_COUNTER};
