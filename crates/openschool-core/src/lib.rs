//! # OpenSchool Core
//!
//! Core types shared by every OpenSchool crate.
//!
//! - [`errors`]: application error type with HTTP response conversion
//! - [`scopes`]: OAuth scope names granted by the identity provider
//!
//! # Example
//!
//! ```ignore
//! use openschool_core::{AppError, scopes};
//!
//! let error = AppError::not_found(anyhow::anyhow!("School not found"));
//! let scope = scopes::students_of_school(1); // "get:students-1"
//! ```

pub mod errors;
pub mod scopes;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse, codes};
