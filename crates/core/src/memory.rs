//! In-memory [`CartStore`] implementation.
//!
//! Keeps carts and items in ordered maps behind a single mutex. Every
//! operation takes the lock once, so the duplicate-product check in
//! `create_item` and the insert it guards are atomic.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::model::{Cart, Item, NewCart, NewItem};
use crate::store::{CartStore, StoreError};
use crate::types::{CartId, ItemId, ProductId, UserId};

#[derive(Debug, Default)]
struct MemoryState {
    last_cart_id: i64,
    last_item_id: i64,
    carts: BTreeMap<CartId, Cart>,
    items: BTreeMap<ItemId, Item>,
}

/// Cloneable handle to a shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All items currently held by a cart, ordered by item ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store lock is poisoned.
    pub fn items_in_cart(&self, cart_id: CartId) -> Result<Vec<Item>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .cloned()
            .collect())
    }

    /// Number of carts in the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store lock is poisoned.
    pub fn cart_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.carts.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("memory store lock poisoned"))
    }
}

impl CartStore for MemoryCartStore {
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, StoreError> {
        let mut state = self.lock()?;
        state.last_cart_id += 1;
        let now = Utc::now();
        let cart = Cart {
            id: CartId::new(state.last_cart_id),
            user_id: cart.user_id(),
            created_at: now,
            updated_at: now,
        };
        state.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn get_cart(&self, user_id: UserId, cart_id: CartId) -> Result<Cart, StoreError> {
        let state = self.lock()?;
        state
            .carts
            .get(&cart_id)
            .filter(|cart| cart.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_item_by_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Item, StoreError> {
        let state = self.lock()?;
        state
            .items
            .values()
            .find(|item| item.cart_id == cart_id && item.product_id == product_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, StoreError> {
        let mut state = self.lock()?;
        if !state.carts.contains_key(&item.cart_id) {
            return Err(StoreError::backend(format!(
                "cart {} does not exist",
                item.cart_id
            )));
        }
        if state
            .items
            .values()
            .any(|existing| existing.cart_id == item.cart_id && existing.product_id == item.product_id)
        {
            return Err(StoreError::Conflict(format!(
                "product {} already in cart {}",
                item.product_id, item.cart_id
            )));
        }

        state.last_item_id += 1;
        let now = Utc::now();
        let item = Item {
            id: ItemId::new(state.last_item_id),
            product_id: item.product_id,
            cart_id: item.cart_id,
            quantity: item.quantity,
            price: item.price,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, item_id: ItemId) -> Result<Item, StoreError> {
        let state = self.lock()?;
        state.items.get(&item_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn remove_item(&self, item_id: ItemId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state
            .items
            .remove(&item_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn remove_items_by_cart(&self, cart_id: CartId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.items.retain(|_, item| item.cart_id != cart_id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use rust_decimal::Decimal;

    use super::*;
    use crate::types::LinePrice;

    fn new_item(cart_id: CartId, product: i64) -> NewItem {
        NewItem {
            cart_id,
            product_id: ProductId::new(product),
            quantity: NonZeroU32::MIN,
            price: LinePrice::new(Decimal::new(999, 2)),
        }
    }

    #[tokio::test]
    async fn test_assigns_increasing_ids() {
        let store = MemoryCartStore::new();
        let owner = NewCart::new(UserId::new(1)).unwrap();
        let first = store.create_cart(owner).await.unwrap();
        let second = store.create_cart(owner).await.unwrap();
        assert_eq!(first.id, CartId::new(1));
        assert_eq!(second.id, CartId::new(2));
    }

    #[tokio::test]
    async fn test_get_cart_is_scoped_to_owner() {
        let store = MemoryCartStore::new();
        let cart = store
            .create_cart(NewCart::new(UserId::new(1)).unwrap())
            .await
            .unwrap();

        assert!(store.get_cart(UserId::new(1), cart.id).await.is_ok());
        let err = store.get_cart(UserId::new(2), cart.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_item_rejects_duplicate_product() {
        let store = MemoryCartStore::new();
        let cart = store
            .create_cart(NewCart::new(UserId::new(1)).unwrap())
            .await
            .unwrap();

        store.create_item(new_item(cart.id, 42)).await.unwrap();
        let err = store.create_item(new_item(cart.id, 42)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.items_in_cart(cart.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_items_by_cart_keeps_other_carts() {
        let store = MemoryCartStore::new();
        let owner = NewCart::new(UserId::new(1)).unwrap();
        let a = store.create_cart(owner).await.unwrap();
        let b = store.create_cart(owner).await.unwrap();
        store.create_item(new_item(a.id, 1)).await.unwrap();
        store.create_item(new_item(b.id, 1)).await.unwrap();

        store.remove_items_by_cart(a.id).await.unwrap();

        assert!(store.items_in_cart(a.id).unwrap().is_empty());
        assert_eq!(store.items_in_cart(b.id).unwrap().len(), 1);
        assert_eq!(store.cart_count().unwrap(), 2);
    }
}
