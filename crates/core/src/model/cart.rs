//! Cart entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::types::{CartId, UserId};

/// Errors raised while constructing a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// The owning user identity is zero/unset.
    #[error("userID is not valid")]
    InvalidOwner,
}

/// A cart that has not been persisted yet.
///
/// The only way to obtain one is [`NewCart::new`], so every value carries a
/// valid owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCart {
    user_id: UserId,
}

impl NewCart {
    /// Build an unsaved cart owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidOwner` if `user_id` is zero.
    pub const fn new(user_id: UserId) -> Result<Self, CartError> {
        if user_id.is_zero() {
            return Err(CartError::InvalidOwner);
        }
        Ok(Self { user_id })
    }

    /// The owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// A persisted cart.
///
/// Timestamps are store-assigned and not part of the wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    /// Store-assigned identity.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was created.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}
