//! Student domain models.
//!
//! Students are read-only over HTTP. They are created by seeding only.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Read projection of a student.
///
/// `school` carries the owning school's *name*, not its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Name of the school the student attends
    pub school: String,
}

/// Input for inserting a student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewStudent {
    #[validate(
        custom(function = "crate::validate_not_blank"),
        length(max = 80, message = "must be at most 80 characters")
    )]
    pub name: String,
    #[validate(
        custom(function = "crate::validate_not_blank"),
        length(max = 80, message = "must be at most 80 characters")
    )]
    pub address: String,
    pub school_id: i32,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, address: impl Into<String>, school_id: i32) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            school_id,
        }
    }
}

/// `GET /students` and `GET /schools/{id}/students`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}
