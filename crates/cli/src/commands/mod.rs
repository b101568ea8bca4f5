//! CLI command implementations.

pub mod migrate;
pub mod truncate;

use secrecy::SecretString;
use thiserror::Error;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] cart_server::db::RepositoryError),

    #[error("Refusing to truncate without --yes")]
    NotConfirmed,
}

/// Read the cart database URL, falling back to `DATABASE_URL`.
fn database_url() -> Result<SecretString, CommandError> {
    let _ = dotenvy::dotenv();

    std::env::var("CART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("CART_DATABASE_URL"))
}
