//! Cart and line item entities.
//!
//! Unsaved values (`NewCart`, `NewItem`) are what callers build; persisted
//! values (`Cart`, `Item`) are what a [`CartStore`](crate::store::CartStore)
//! hands back once it has assigned identities and timestamps.

pub mod cart;
pub mod item;

pub use cart::{Cart, CartError, NewCart};
pub use item::{Item, NewItem};
