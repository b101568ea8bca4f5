//! JSON error envelope with Sentry integration.
//!
//! Every failed request answers with
//! `{"error":{"code":<n>,"details":"<Kind> - <details>"}}`. Server errors are
//! captured to Sentry before responding; their details never carry internal
//! error text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for the cart API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or semantics rejected.
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Missing or unknown access key.
    #[error("Unauthorised access: {0}")]
    Unauthorised(String),

    /// Resource not found (or not visible to the caller).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path or value parameters rejected.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// The error itself.
    pub error: ErrorBody,
}

/// Code and human-readable details of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Application error code (`100` followed by the HTTP status).
    pub code: u32,
    /// `"<Kind> - <details>"`, or just `"<Kind>"` when there are no details.
    pub details: String,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorised(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidParams(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Application error code.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::BadRequest(_) => 100_400,
            Self::Unauthorised(_) => 100_401,
            Self::NotFound(_) => 100_404,
            Self::InvalidParams(_) => 100_422,
            Self::Internal(_) => 100_500,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "Bad Request",
            Self::Unauthorised(_) => "Unauthorised access",
            Self::NotFound(_) => "Not found",
            Self::InvalidParams(_) => "Invalid params",
            Self::Internal(_) => "Internal error",
        }
    }

    fn details(&self) -> &str {
        match self {
            Self::BadRequest(d)
            | Self::Unauthorised(d)
            | Self::NotFound(d)
            | Self::InvalidParams(d)
            | Self::Internal(d) => d,
        }
    }

    /// Build the response envelope.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        let details = match self.details() {
            "" => self.kind().to_string(),
            d => format!("{} - {d}", self.kind()),
        };
        ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(self.envelope())).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_details() {
        let err = ApiError::NotFound("cart does not exist".to_string());
        let json = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": {"code": 100_404, "details": "Not found - cart does not exist"}
            })
        );
    }

    #[test]
    fn test_envelope_without_details() {
        let err = ApiError::Internal(String::new());
        let envelope = err.envelope();
        assert_eq!(envelope.error.code, 100_500);
        assert_eq!(envelope.error.details, "Internal error");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest(String::new()), StatusCode::BAD_REQUEST, 100_400),
            (ApiError::Unauthorised(String::new()), StatusCode::UNAUTHORIZED, 100_401),
            (ApiError::NotFound(String::new()), StatusCode::NOT_FOUND, 100_404),
            (
                ApiError::InvalidParams(String::new()),
                StatusCode::UNPROCESSABLE_ENTITY,
                100_422,
            ),
            (
                ApiError::Internal(String::new()),
                StatusCode::INTERNAL_SERVER_ERROR,
                100_500,
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Unauthorised("incorrect access_key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
