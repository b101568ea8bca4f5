//! Persistence port for carts and items.
//!
//! [`CartStore`] is the storage contract the cart service depends on. The
//! server crate provides a `PostgreSQL` implementation; [`MemoryCartStore`]
//! is an in-process implementation used in tests and local tooling.
//!
//! Every operation reports an absent record as [`StoreError::NotFound`] so
//! callers can tell "no such row" apart from backend failures.
//!
//! [`MemoryCartStore`]: crate::memory::MemoryCartStore

use thiserror::Error;

use crate::model::{Cart, Item, NewCart, NewItem};
use crate::types::{CartId, ItemId, ProductId, UserId};

/// Boxed lower-level error carried by [`StoreError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a [`CartStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist (or is not visible to the caller).
    #[error("record not found")]
    NotFound,

    /// A uniqueness or integrity constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Any other lower-level fault (I/O, connectivity, corrupt data).
    #[error("storage backend failure: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    /// Wrap a lower-level error as a backend failure.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }

    /// Whether this is the `NotFound` classification.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Storage operations the cart service relies on.
///
/// Implementations own identity and timestamp assignment. Uniqueness of
/// `(cart_id, product_id)` must be enforced on insert and reported as
/// [`StoreError::Conflict`].
pub trait CartStore: Send + Sync {
    /// Persist a new cart and return it with its assigned identity.
    fn create_cart(&self, cart: NewCart) -> impl Future<Output = Result<Cart, StoreError>> + Send;

    /// Fetch a cart by ID, scoped to its owner.
    ///
    /// Returns `NotFound` both when the cart does not exist and when it is
    /// owned by someone else.
    fn get_cart(
        &self,
        user_id: UserId,
        cart_id: CartId,
    ) -> impl Future<Output = Result<Cart, StoreError>> + Send;

    /// Find the item holding `product_id` in `cart_id`.
    fn find_item_by_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Item, StoreError>> + Send;

    /// Persist a new item under its cart.
    fn create_item(&self, item: NewItem) -> impl Future<Output = Result<Item, StoreError>> + Send;

    /// Fetch an item by ID.
    fn get_item(&self, item_id: ItemId) -> impl Future<Output = Result<Item, StoreError>> + Send;

    /// Delete one item.
    fn remove_item(&self, item_id: ItemId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete every item of a cart. The cart itself is kept.
    fn remove_items_by_cart(
        &self,
        cart_id: CartId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Check that the backend is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }
}
