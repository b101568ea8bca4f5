//! Core value types for carts.
//!
//! This module provides type-safe wrappers for identities and line prices.

pub mod id;
pub mod price;

pub use id::*;
pub use price::LinePrice;
