//! # OpenSchool API
//!
//! A REST API for school and student records, built with Rust, Axum and
//! PostgreSQL. Access control is delegated to an external OAuth/OIDC identity
//! provider: callers present a bearer JWT and every protected request is
//! authorized by the token's `scope` claim.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer token extractor, scope extractors
//! ├── modules/          # Feature modules
//! │   ├── health       # Liveness probe
//! │   ├── schools/     # School CRUD and per-school student listing
//! │   └── students/    # Student listing
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus recorder and business counters
//! ├── router.rs         # Main application router
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Workspace crates carry everything below HTTP: `openschool-core` (errors,
//! scopes), `openschool-config`, `openschool-db` (the `Store` trait),
//! `openschool-auth` (token verification, authorization guard),
//! `openschool-models` and `openschool-cli` (seeding and admin commands).
//!
//! ## Scopes
//!
//! | Endpoint | Required scope |
//! |----------|----------------|
//! | `GET /schools` | none |
//! | `POST /schools` | `post:school` |
//! | `PATCH /schools/{id}` | `modify:school` |
//! | `DELETE /schools/{id}` | `modify:school` |
//! | `GET /students` | `get:students` |
//! | `GET /schools/{id}/students` | `get:students` or `get:students-{id}` |
//!
//! A missing or invalid token is a 401; a valid token without the scope is a
//! 403 with code `unauthorized`.
//!
//! ## Quick Start
//!
//! ```bash
//! # in-memory store, shared-secret tokens
//! JWT_SECRET=dev-secret cargo run -- --seed
//! JWT_SECRET=dev-secret cargo run --bin openschool-cli -- issue-token --role principal --school 1
//! ```
//!
//! With `DATABASE_URL` set the server uses PostgreSQL and applies migrations
//! on startup. With `AUTH0_DOMAIN` and `AUTH0_AUDIENCE` (and no
//! `JWT_SECRET`) tokens are verified against the provider's JWKS.
//!
//! API documentation is served at `/scalar` and `/api-docs/openapi.json`.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use openschool_auth;
pub use openschool_config;
pub use openschool_core;
pub use openschool_db;
pub use openschool_models;
