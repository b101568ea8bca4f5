//! Database operations for the cart `PostgreSQL` store.
//!
//! ## Tables (schema `cart`)
//!
//! - `cart` - One row per cart, owned by a user
//! - `item` - Line items, unique per `(cart_id, product_id)`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p cart-cli -- migrate
//! ```

pub mod carts;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cart_core::StoreError;

pub use carts::PgCartStore;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate product in a cart).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound | RepositoryError::Database(sqlx::Error::RowNotFound) => {
                Self::NotFound
            }
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::backend(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Delete every cart and item and reset the ID sequences.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn truncate_all(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query("TRUNCATE TABLE cart.item, cart.cart RESTART IDENTITY")
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_classification() {
        assert!(StoreError::from(RepositoryError::NotFound).is_not_found());
        assert!(StoreError::from(RepositoryError::Database(sqlx::Error::RowNotFound)).is_not_found());
        assert!(matches!(
            StoreError::from(RepositoryError::Conflict("dup".to_string())),
            StoreError::Conflict(_)
        ));
        assert!(matches!(
            StoreError::from(RepositoryError::DataCorruption("bad".to_string())),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            StoreError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut)),
            StoreError::Backend(_)
        ));
    }
}
