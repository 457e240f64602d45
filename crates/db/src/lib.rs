//! `orderdesk-db` -- PostgreSQL access for order validation.
//!
//! Provides the connection pool, the read-only order lookup repository and
//! the [`PgExistenceOracle`] that plugs it into the validation pipeline.
//! The `orders` table itself is owned and migrated elsewhere.

use sqlx::postgres::PgPoolOptions;

pub mod oracle;
pub mod repositories;

pub use oracle::PgExistenceOracle;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
