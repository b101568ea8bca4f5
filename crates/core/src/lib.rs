//! Cart Core - domain library for the shopping-cart backend.
//!
//! This crate holds the business rules and no I/O. It is shared by:
//! - `server` - HTTP API binary that wires the service to `PostgreSQL`
//! - `integration-tests` - End-to-end tests over the in-memory store
//!
//! # Architecture
//!
//! The cart service depends only on the [`store::CartStore`] trait. Concrete
//! backends live elsewhere (the server crate's `PgCartStore`) or are kept
//! in-process ([`memory::MemoryCartStore`]) so the rules can be tested
//! without a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and line prices
//! - [`model`] - Cart and item entities
//! - [`store`] - Persistence port
//! - [`service`] - Cart service (ownership and uniqueness rules)
//! - [`memory`] - In-memory store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod memory;
pub mod model;
pub mod service;
pub mod store;
pub mod types;

pub use memory::MemoryCartStore;
pub use model::{Cart, CartError, Item, NewCart, NewItem};
pub use service::{CartService, CartServiceError};
pub use store::{BoxError, CartStore, StoreError};
pub use types::*;
