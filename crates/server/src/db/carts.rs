//! `PostgreSQL` implementation of the cart persistence port.
//!
//! Queries are checked at runtime (`sqlx::query_as` with `FromRow` rows) so
//! the crate builds without a live database.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cart_core::{
    Cart, CartId, CartStore, Item, ItemId, LinePrice, NewCart, NewItem, ProductId, StoreError,
    UserId,
};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    cart_id: i64,
    product_id: i64,
    quantity: i64,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "invalid quantity {} for item {}",
                    row.quantity, row.id
                ))
            })?;

        Ok(Self {
            id: ItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            cart_id: CartId::new(row.cart_id),
            quantity,
            price: LinePrice::new(row.price),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, price, created_at, updated_at";

// =============================================================================
// Store
// =============================================================================

/// Cart store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run an item lookup bound to `params` in order.
    async fn fetch_item(&self, query: &str, params: &[i64]) -> Result<Item, RepositoryError> {
        let mut q = sqlx::query_as::<_, ItemRow>(query);
        for &value in params {
            q = q.bind(value);
        }
        q.fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .try_into()
    }
}

impl CartStore for PgCartStore {
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, StoreError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO cart.cart (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at, updated_at
            ",
        )
        .bind(cart.user_id())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(row.into())
    }

    async fn get_cart(&self, user_id: UserId, cart_id: CartId) -> Result<Cart, StoreError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at, updated_at
            FROM cart.cart
            WHERE user_id = $1 AND id = $2
            ",
        )
        .bind(user_id)
        .bind(cart_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn find_item_by_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Item, StoreError> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM cart.item WHERE cart_id = $1 AND product_id = $2"
        );
        Ok(self
            .fetch_item(&query, &[cart_id.as_i64(), product_id.as_i64()])
            .await?)
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, StoreError> {
        let query = format!(
            r"
            INSERT INTO cart.item (cart_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING {ITEM_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(item.cart_id)
            .bind(item.product_id)
            .bind(i64::from(item.quantity.get()))
            .bind(item.price.amount())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "product {} already in cart {}",
                        item.product_id, item.cart_id
                    ));
                }
                RepositoryError::Database(e)
            })?;

        Ok(Item::try_from(row)?)
    }

    async fn get_item(&self, item_id: ItemId) -> Result<Item, StoreError> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM cart.item WHERE id = $1");
        Ok(self.fetch_item(&query, &[item_id.as_i64()]).await?)
    }

    async fn remove_item(&self, item_id: ItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cart.item WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove_items_by_cart(&self, cart_id: CartId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart.item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }
}
