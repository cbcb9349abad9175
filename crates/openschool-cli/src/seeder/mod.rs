//! Database seeding.
//!
//! - [`seed_fixtures`]: the fixed two-school data set used in development and
//!   by the server's `--seed` flag
//! - [`seed_random`]: fake schools and students for load and UI testing
//! - [`clear_all`]: wipes every student and school

mod fixtures;
mod models;
mod random;

use openschool_core::AppError;
use openschool_db::Store;
use tracing::info;

pub use fixtures::{FIXTURE_SCHOOLS, FIXTURE_STUDENTS, seed_fixtures};
pub use models::{RandomSeedConfig, SchoolSeed, SeedSummary, StudentSeed};
pub use random::{generate_schools, generate_students, seed_random};

/// Removes all data and restarts id assignment.
pub async fn clear_all(store: &dyn Store) -> Result<(), AppError> {
    store.clear().await?;
    info!("Cleared all schools and students");
    Ok(())
}

/// Clears the store, then seeds the fixtures.
pub async fn reset_and_seed(store: &dyn Store) -> Result<SeedSummary, AppError> {
    clear_all(store).await?;
    seed_fixtures(store).await
}
