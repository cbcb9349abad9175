//! # OpenSchool Config
//!
//! Configuration types for the OpenSchool API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`auth`]: bearer token verification (identity provider, audience, issuer)
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: listen address and metrics toggle
//!
//! Every type has a `from_env()` constructor and a `from_lookup()` constructor
//! taking the variable source explicitly, which is what the tests use.
//!
//! # Example
//!
//! ```ignore
//! use openschool_config::{AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let auth_config = AuthConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let database_config = DatabaseConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod auth;
pub mod cors;
pub mod database;
pub mod server;

// Re-export commonly used types at crate root
pub use auth::{AuthConfig, VerificationMode};
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Reads a variable from the process environment.
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
