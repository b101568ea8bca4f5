//! Empty every cart table.
//!
//! Intended for test and staging databases. Requires `--yes`.
//!
//! ```bash
//! cart-cli truncate --yes
//! ```

use cart_server::db;

use super::{CommandError, database_url};

/// Delete all carts and items and reset ID sequences.
///
/// # Errors
///
/// Returns `CommandError::NotConfirmed` unless `confirmed` is set.
/// Returns `CommandError` if the connection or the statement fails.
pub async fn run(confirmed: bool) -> Result<(), CommandError> {
    if !confirmed {
        return Err(CommandError::NotConfirmed);
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    tracing::warn!("Truncating cart.item and cart.cart");
    db::truncate_all(&pool).await?;

    tracing::info!("Cart tables truncated");
    Ok(())
}
