//! # OpenSchool Auth
//!
//! Bearer token verification and scope-based authorization.
//!
//! - [`claims`]: the verified claim set and its scopes
//! - [`verifier`]: the [`TokenVerifier`] trait with the JWKS (RS256) and
//!   shared-secret (HS256) implementations
//! - [`guard`]: pure allow/deny decisions over a claim set
//! - [`jwt`]: HS256 token issuing for local development and tests
//!
//! # Example
//!
//! ```ignore
//! use openschool_auth::{guard, TokenVerifier};
//!
//! let claims = verifier.verify(token).await?;
//! guard::require_school_students_scope(&claims, school_id)?;
//! ```

pub mod claims;
pub mod guard;
pub mod jwt;
pub mod verifier;

// Re-export commonly used types at crate root
pub use claims::{Audience, Claims};
pub use guard::Decision;
pub use jwt::issue_token;
pub use verifier::{JwksVerifier, SecretVerifier, TokenVerifier, verifier_from_config};
