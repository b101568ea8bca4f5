//! Cart service: the business rules over carts and items.
//!
//! Every operation takes the caller's verified user identity as its first
//! argument and runs a short check-then-act sequence against a
//! [`CartStore`], stopping at the first failing step.
//!
//! # Ownership
//!
//! Ownership is checked with [`CartStore::get_cart`], which is scoped to the
//! owner. A cart that exists under another user is indistinguishable from a
//! missing one, so callers only ever see [`CartServiceError::CartNotFound`].
//!
//! # Consistency
//!
//! The duplicate-product check in [`CartService::add_item`] and the insert
//! that follows are two separate store calls. The store enforces uniqueness
//! on insert; a conflict there is reported as
//! [`CartServiceError::DuplicateProduct`], same as the pre-check.
//! [`CartService::empty_cart`] likewise runs its ownership check and bulk
//! delete as two calls with no transaction around them.

use thiserror::Error;

use crate::model::{Cart, CartError, Item, NewCart, NewItem};
use crate::store::{CartStore, StoreError};
use crate::types::{CartId, ItemId, UserId};

/// Errors returned by [`CartService`] operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// Caller identity is missing or invalid.
    #[error("userID is not valid")]
    InvalidOwner,

    /// Cart does not exist or is not owned by the caller.
    #[error("cart not found")]
    CartNotFound,

    /// Item does not exist.
    #[error("item not found")]
    ItemNotFound,

    /// Product is already in the cart.
    #[error("product is already in the cart")]
    DuplicateProduct,

    /// Lower-level storage fault.
    #[error("storage failure: {0}")]
    StorageFailure(#[source] StoreError),
}

impl From<CartError> for CartServiceError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidOwner => Self::InvalidOwner,
        }
    }
}

/// Business-rule core over a [`CartStore`].
///
/// Holds no mutable state of its own; clone it freely.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    /// Create a service backed by `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create an empty cart owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOwner` if `user_id` is zero (nothing is persisted).
    /// Returns `StorageFailure` if the cart cannot be saved.
    pub async fn create_cart(&self, user_id: UserId) -> Result<Cart, CartServiceError> {
        let cart = NewCart::new(user_id)?;
        self.store
            .create_cart(cart)
            .await
            .map_err(CartServiceError::StorageFailure)
    }

    /// Add a product line to one of the caller's carts.
    ///
    /// # Errors
    ///
    /// Returns `CartNotFound` if the cart is missing or owned by someone else.
    /// Returns `DuplicateProduct` if the product is already in the cart.
    /// Returns `StorageFailure` for any other store fault.
    pub async fn add_item(&self, user_id: UserId, item: NewItem) -> Result<Item, CartServiceError> {
        self.owned_cart(user_id, item.cart_id).await?;

        match self
            .store
            .find_item_by_product(item.cart_id, item.product_id)
            .await
        {
            Ok(_) => return Err(CartServiceError::DuplicateProduct),
            Err(StoreError::NotFound) => {}
            Err(err) => return Err(CartServiceError::StorageFailure(err)),
        }

        self.store.create_item(item).await.map_err(|err| match err {
            StoreError::Conflict(_) => CartServiceError::DuplicateProduct,
            other => CartServiceError::StorageFailure(other),
        })
    }

    /// Remove a single item from one of the caller's carts.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    /// Returns `CartNotFound` if the item's cart is not owned by the caller.
    /// Returns `StorageFailure` for any other store fault.
    pub async fn remove_item(&self, user_id: UserId, item_id: ItemId) -> Result<(), CartServiceError> {
        let item = match self.store.get_item(item_id).await {
            Ok(item) => item,
            Err(StoreError::NotFound) => return Err(CartServiceError::ItemNotFound),
            Err(err) => return Err(CartServiceError::StorageFailure(err)),
        };

        self.owned_cart(user_id, item.cart_id).await?;

        self.store
            .remove_item(item.id)
            .await
            .map_err(CartServiceError::StorageFailure)
    }

    /// Remove every item from one of the caller's carts. The cart is kept.
    ///
    /// # Errors
    ///
    /// Returns `CartNotFound` if the cart is missing or owned by someone else.
    /// Returns `StorageFailure` for any other store fault.
    pub async fn empty_cart(&self, user_id: UserId, cart_id: CartId) -> Result<(), CartServiceError> {
        self.owned_cart(user_id, cart_id).await?;

        self.store
            .remove_items_by_cart(cart_id)
            .await
            .map_err(CartServiceError::StorageFailure)
    }

    async fn owned_cart(&self, user_id: UserId, cart_id: CartId) -> Result<Cart, CartServiceError> {
        self.store
            .get_cart(user_id, cart_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => CartServiceError::CartNotFound,
                other => CartServiceError::StorageFailure(other),
            })
    }
}
