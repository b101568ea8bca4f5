//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cart-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary at build time:
//!
//! ```text
//! crates/server/migrations/
//! ├── 20260301000001_create_carts.sql
//! └── 20260301000002_create_items.sql
//! ```

use cart_server::db::{self, MIGRATOR};

use super::{CommandError, database_url};

/// Run all pending migrations against the cart database.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing, the connection
/// fails, or a migration cannot be applied.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to cart database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        "Running cart migrations..."
    );
    MIGRATOR.run(&pool).await?;

    tracing::info!("Cart migrations complete!");
    Ok(())
}
