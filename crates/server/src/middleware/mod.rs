//! HTTP middleware stack for the cart API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. JSON content type (default `Content-Type` on cart routes)
//!
//! Authentication is an extractor rather than a layer; see [`auth`].

pub mod auth;
pub mod request_id;

pub use auth::AuthenticatedUser;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
