//! Integration tests for the cart service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process HTTP tests (no external services)
//! cargo test -p cart-integration-tests
//!
//! # PostgreSQL store tests (need a migrated database)
//! CART_DATABASE_URL=postgres://... cargo test -p cart-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_api` - Full HTTP flows against the router with the in-memory store
//! - `postgres_store` - `PgCartStore` against a real database

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use tower::ServiceExt;

use cart_core::MemoryCartStore;
use cart_server::services::{AccessKeyRegistry, ErrorCounters, MetricsSink};
use cart_server::{AppState, router};

/// Access key of development user 1.
pub const USER_1_KEY: &str = "abcdef123456";
/// Access key of development user 12.
pub const USER_12_KEY: &str = "bcdefg123456";
/// Access key of development user 20.
pub const USER_20_KEY: &str = "cdefgh123456";

/// Largest response body the helpers will read.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// A router over a fresh in-memory store, plus handles for inspection.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryCartStore,
    pub counters: Arc<ErrorCounters>,
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    /// Parsed JSON body; `Value::Null` when empty, `Value::String` when not JSON.
    pub body: Value,
}

impl TestApp {
    /// Build an app with the development access keys.
    ///
    /// # Panics
    ///
    /// Panics if the metrics registry cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let store = MemoryCartStore::new();
        let counters = Arc::new(ErrorCounters::new().expect("metrics registry"));
        let sink: Arc<dyn MetricsSink> = counters.clone();
        let state = AppState::new(store.clone(), AccessKeyRegistry::development(), sink);
        Self {
            router: router(state),
            store,
            counters,
        }
    }

    /// Send a request, optionally authenticated and with a raw body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not JSON.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        key: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("Authorisation", format!("Key {key}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let content_type = header("content-type");
        let request_id = header("x-request-id");

        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            content_type,
            request_id,
            body,
        }
    }

    /// `POST /carts` as the owner of `key`; returns the new cart ID.
    ///
    /// # Panics
    ///
    /// Panics if the cart is not created.
    pub async fn create_cart(&self, key: &str) -> i64 {
        let response = self.send(Method::POST, "/carts", Some(key), None).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_i64().expect("cart id")
    }

    /// `POST /carts/{cart_id}/items` with a JSON body.
    pub async fn add_item(&self, key: &str, cart_id: i64, body: &str) -> TestResponse {
        self.send(
            Method::POST,
            &format!("/carts/{cart_id}/items"),
            Some(key),
            Some(body),
        )
        .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResponse {
    /// The `error.details` string of an error envelope.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.body["error"]["details"].as_str()
    }

    /// The `error.code` of an error envelope.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        self.body["error"]["code"].as_i64()
    }
}
