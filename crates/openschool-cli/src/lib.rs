//! # OpenSchool CLI
//!
//! Seeding utilities for OpenSchool testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary
//! and by the server's `--seed` flag. Everything goes through the
//! [`Store`](openschool_db::Store) trait, so the same code seeds PostgreSQL and
//! the in-memory store.
//!
//! ## Usage
//!
//! ```ignore
//! use openschool_cli::seeder::{seed_fixtures, seed_random, RandomSeedConfig};
//!
//! seed_fixtures(store.as_ref()).await?;
//! seed_random(store.as_ref(), RandomSeedConfig::new(10)).await?;
//! ```

pub mod seeder;
