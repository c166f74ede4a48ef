//! # Homeroom DB
//!
//! Database pool and migration utilities for the Homeroom API.
//!
//! The connection string is read from the `DATABASE_URL` environment
//! variable. The pool is cheaply cloneable; initialize it once at
//! startup and hand clones to the application state.

use std::env;

use anyhow::Context;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection fails; there
/// is nothing useful the server can do without a database.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Applies the embedded migrations in `migrations/` at the workspace
/// root. Used by `homeroom-cli init-db`; the server itself never
/// migrates.
pub async fn run_migrations(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("failed to apply database migrations")?;
    Ok(())
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
