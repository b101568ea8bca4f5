//! HTTP routes for the cart API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (store reachable)
//! GET    /metrics                - Failure counters (Prometheus text)
//!
//! # Carts (require `Authorisation: Key <access-key>`)
//! POST   /carts                  - Create a cart
//! POST   /carts/{cart_id}/items  - Add an item
//! DELETE /carts/{cart_id}/items  - Empty a cart
//! DELETE /items/{item_id}        - Remove an item
//! ```

pub mod carts;
pub mod health;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Request, Response, header::CONTENT_TYPE},
    middleware,
    routing::{delete, get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use cart_core::CartStore;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Cart routes; every response defaults to `Content-Type: application/json`.
pub fn cart_routes<S: CartStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/carts", post(carts::create_cart::<S>))
        .route(
            "/carts/{cart_id}/items",
            post(carts::add_item::<S>).delete(carts::empty_cart::<S>),
        )
        .route("/items/{item_id}", delete(carts::remove_item::<S>))
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
}

/// Build the full application router with tracing and request IDs.
///
/// Sentry layers are added by the binary around this router.
pub fn router<S: CartStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness::<S>))
        .route("/metrics", get(health::metrics::<S>))
        .merge(cart_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
