//! Access-key authentication extractor.
//!
//! Handlers receive the caller's identity as an explicit
//! [`AuthenticatedUser`] argument; nothing is stashed in request extensions.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use cart_core::UserId;

use crate::error::ApiError;
use crate::services::access::{AUTHORISATION_HEADER, AccessKeyRegistry};

/// Extractor that requires a valid `Authorisation: Key <access-key>` header.
///
/// Rejects with `401 Unauthorised access - incorrect access_key` otherwise.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(AuthenticatedUser(user_id): AuthenticatedUser) -> String {
///     format!("hello, user {user_id}")
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl<St> FromRequestParts<St> for AuthenticatedUser
where
    AccessKeyRegistry: FromRef<St>,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let registry = AccessKeyRegistry::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORISATION_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        match registry.verify_header(header) {
            Ok(user_id) => {
                tracing::Span::current().record("user_id", user_id.as_i64());
                Ok(Self(user_id))
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected access key");
                Err(ApiError::Unauthorised("incorrect access_key".to_string()))
            }
        }
    }
}
