//! # OpenSchool DB
//!
//! Persistence layer for the OpenSchool API.
//!
//! The [`Store`] trait is the only way handlers touch data. Two implementations
//! exist:
//!
//! - [`PgStore`]: PostgreSQL via SQLx, schema managed by the migrations in
//!   `migrations/`
//! - [`MemoryStore`]: process-local maps behind a `tokio::sync::RwLock`, used
//!   when no `DATABASE_URL` is configured and by the test suites
//!
//! # Example
//!
//! ```ignore
//! use openschool_db::{init_db_pool, run_migrations, PgStore};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! run_migrations(&pool).await?;
//! let store = PgStore::new(pool);
//! let schools = store.list_schools().await?;
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

use anyhow::Context;
use openschool_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Creates a PostgreSQL connection pool.
///
/// # Errors
///
/// Fails if `DATABASE_URL` is not configured or the connection cannot be
/// established.
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let database_url = config
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}
