//! School domain models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Column width of every name/address field.
pub const MAX_FIELD_LENGTH: u64 = 80;

/// A school.
///
/// `name` and `address` are each unique across all schools. A school that
/// still has students cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct School {
    pub id: i32,
    pub name: String,
    pub address: String,
}

/// Body of `POST /schools` and `PATCH /schools/{id}`.
///
/// Both fields are required on update as well; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SchoolPayload {
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
}

/// `GET /schools`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolListResponse {
    pub schools: Vec<School>,
}

/// `PATCH /schools/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolResponse {
    pub school: School,
}

/// `DELETE /schools/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedSchoolResponse {
    pub school_id: i32,
}
