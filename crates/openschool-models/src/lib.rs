//! # OpenSchool Models
//!
//! Domain models and DTOs for the OpenSchool API.
//!
//! - [`schools`]: the School entity, its request payload and response envelopes
//! - [`students`]: the Student read projection and the seeding payload
//!
//! # Example
//!
//! ```ignore
//! use openschool_models::{SchoolPayload, SchoolListResponse};
//! use validator::Validate;
//!
//! let payload = SchoolPayload { name: "X".into(), address: "Y".into() };
//! assert!(payload.validate().is_ok());
//! ```

pub mod schools;
pub mod students;

// Re-export commonly used types at crate root for convenience
pub use schools::{
    DeletedSchoolResponse, MAX_FIELD_LENGTH, School, SchoolListResponse, SchoolPayload,
    SchoolResponse,
};
pub use students::{NewStudent, Student, StudentListResponse};

use validator::ValidationError;

/// Rejects strings that are empty or contain only whitespace.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}
