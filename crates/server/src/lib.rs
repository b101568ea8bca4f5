//! Cart server library.
//!
//! Exposes the HTTP façade over [`cart_core::CartService`] as a library so
//! the router can be driven in-process by tests and tooling.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::router;
pub use state::AppState;
