//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use cart_core::{CartService, CartStore};

use crate::services::{AccessKeyRegistry, MetricsSink};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the store so the same router
/// runs against `PostgreSQL` in production and in memory in tests.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    service: CartService<S>,
    access_keys: AccessKeyRegistry,
    metrics: Arc<dyn MetricsSink>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CartStore> AppState<S> {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence backend for carts and items
    /// * `access_keys` - Registry used to authenticate callers
    /// * `metrics` - Sink receiving server-error events
    pub fn new(store: S, access_keys: AccessKeyRegistry, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                service: CartService::new(store),
                access_keys,
                metrics,
            }),
        }
    }
}

impl<S> AppState<S> {
    /// Get a reference to the cart service.
    #[must_use]
    pub fn service(&self) -> &CartService<S> {
        &self.inner.service
    }

    /// Get a reference to the access-key registry.
    #[must_use]
    pub fn access_keys(&self) -> &AccessKeyRegistry {
        &self.inner.access_keys
    }

    /// Get a reference to the metrics sink.
    #[must_use]
    pub fn metrics(&self) -> &dyn MetricsSink {
        self.inner.metrics.as_ref()
    }
}

impl<S> FromRef<AppState<S>> for AccessKeyRegistry {
    fn from_ref(state: &AppState<S>) -> Self {
        state.access_keys().clone()
    }
}
