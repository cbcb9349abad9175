//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: bearer token extractor and scope-checking extractors
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor verifies the token and extracts claims (401 on failure)
//! 3. Scope extractors check the required scope (403 on failure)
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequirePostSchool;
//!
//! async fn create_school(
//!     RequirePostSchool(auth_user): RequirePostSchool,
//! ) -> impl IntoResponse {
//!     // Only executes if the token carries "post:school"
//! }
//! ```

pub mod auth;
