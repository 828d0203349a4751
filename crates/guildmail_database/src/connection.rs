//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use guildmail_error::{StoreError, StoreErrorKind};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Establish a connection to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable to determine the connection
/// string.
///
/// # Errors
///
/// Returns an error if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub fn establish_connection() -> Result<PgConnection, StoreError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        StoreError::new(StoreErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;

    PgConnection::establish(&database_url)
        .map_err(|e| StoreError::new(StoreErrorKind::Connection(e.to_string())))
}

/// Run all pending embedded migrations.
///
/// # Errors
///
/// Returns a `Migration` error when any migration fails to apply.
pub fn run_migrations(conn: &mut PgConnection) -> Result<(), StoreError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::new(StoreErrorKind::Migration(e.to_string())))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}
