//! Failure counters for the HTTP façade.
//!
//! Handlers report every 500 response to a [`MetricsSink`] labelled with
//! the operation and the failure reason. The sink is injected through
//! application state and owns its own Prometheus registry; nothing is
//! registered process-wide.

use prometheus::proto::MetricFamily;
use prometheus::{IntCounterVec, Opts, Registry};

/// Fully-qualified name of the server-error counter.
pub const SERVER_ERROR_COUNTER: &str = "cart_error_500_counter";

/// Receives failure events from request handlers.
pub trait MetricsSink: Send + Sync + 'static {
    /// Record a 500 response for `operation` caused by `reason`.
    fn record_server_error(&self, operation: &'static str, reason: &'static str);

    /// Metric families to expose at `/metrics`.
    fn gather(&self) -> Vec<MetricFamily> {
        Vec::new()
    }
}

/// Prometheus counters labelled by `method` and `reason`.
#[derive(Debug, Clone)]
pub struct ErrorCounters {
    registry: Registry,
    server_errors: IntCounterVec,
}

impl ErrorCounters {
    /// Create the counters in a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns `prometheus::Error` if the counter cannot be created or
    /// registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let server_errors = IntCounterVec::new(
            Opts::new(
                "error_500_counter",
                "Responses with status 500, partitioned by handler and reason.",
            )
            .namespace("cart"),
            &["method", "reason"],
        )?;
        registry.register(Box::new(server_errors.clone()))?;

        Ok(Self {
            registry,
            server_errors,
        })
    }

    /// Current value for one label pair.
    ///
    /// Reading a pair that was never recorded exports it with value zero.
    #[must_use]
    pub fn count(&self, method: &str, reason: &str) -> u64 {
        self.server_errors.with_label_values(&[method, reason]).get()
    }
}

impl MetricsSink for ErrorCounters {
    fn record_server_error(&self, operation: &'static str, reason: &'static str) {
        self.server_errors
            .with_label_values(&[operation, reason])
            .inc();
    }

    fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prometheus::{Encoder, TextEncoder};

    use super::*;

    fn render(counters: &ErrorCounters) -> String {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&counters.gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_counts_by_label() {
        let counters = ErrorCounters::new().unwrap();
        counters.record_server_error("addItem", "service");
        counters.record_server_error("addItem", "service");
        counters.record_server_error("emptyCart", "service");

        assert_eq!(counters.count("addItem", "service"), 2);
        assert_eq!(counters.count("emptyCart", "service"), 1);

        let text = render(&counters);
        assert!(text.contains(r#"cart_error_500_counter{method="addItem",reason="service"} 2"#));
        assert!(text.contains(r#"cart_error_500_counter{method="emptyCart",reason="service"} 1"#));
    }

    #[test]
    fn test_nothing_exported_before_first_failure() {
        let counters = ErrorCounters::new().unwrap();
        assert!(!render(&counters).contains(SERVER_ERROR_COUNTER));
    }

    #[test]
    fn test_registries_are_independent() {
        let first = ErrorCounters::new().unwrap();
        let second = ErrorCounters::new().unwrap();
        first.record_server_error("createCart", "service");

        assert_eq!(first.count("createCart", "service"), 1);
        assert_eq!(second.count("createCart", "service"), 0);
    }
}
