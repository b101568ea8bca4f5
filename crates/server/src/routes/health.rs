//! Health and metrics endpoints.

use axum::{
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
};
use prometheus::{Encoder, TextEncoder};

use cart_core::CartStore;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness<S: CartStore + 'static>(State(state): State<AppState<S>>) -> StatusCode {
    match state.service().store().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            state.metrics().record_server_error("readiness", "store");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Failure counters in the Prometheus text exposition format.
pub async fn metrics<S: CartStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse> {
    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    encoder
        .encode(&state.metrics().gather(), &mut encoded)
        .map_err(|source| {
            tracing::error!(error = %source, "failed to encode metrics response");
            ApiError::Internal("could not encode metrics".to_string())
        })?;

    Ok((
        [(CONTENT_TYPE, encoder.format_type().to_owned())],
        String::from_utf8_lossy(&encoded).into_owned(),
    ))
}
