//! Line item entity.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{CartId, ItemId, LinePrice, ProductId};

/// An item to be added to a cart.
///
/// Plain data assembled by the caller. Quantity is positive by type; the
/// price is the line total and is never re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewItem {
    /// Cart the item goes into.
    pub cart_id: CartId,
    /// Product being added.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: NonZeroU32,
    /// Total price for `quantity` units.
    pub price: LinePrice,
}

/// A persisted line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Store-assigned identity.
    pub id: ItemId,
    /// Product in this line.
    pub product_id: ProductId,
    /// Cart the line belongs to.
    pub cart_id: CartId,
    /// Number of units.
    pub quantity: NonZeroU32,
    /// Total price of the line, i.e. product price × quantity.
    pub price: LinePrice,
    /// When the item was created.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}
