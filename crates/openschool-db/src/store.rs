use async_trait::async_trait;
use openschool_core::AppError;
use openschool_models::{NewStudent, School, SchoolPayload, Student};
use validator::Validate;

/// Data access for schools and students.
///
/// Listings are ordered by id. Error mapping is part of the contract:
///
/// | Failure | Error |
/// |---|---|
/// | id does not exist | [`AppError::not_found`] |
/// | empty, blank or over-long name/address | [`AppError::bad_request`] |
/// | name/address collision | [`AppError::conflict`] (409) |
/// | delete of a school with students | [`AppError::has_dependents`] (405) |
/// | anything else | [`AppError::internal`] |
///
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    async fn list_schools(&self) -> Result<Vec<School>, AppError>;

    async fn create_school(&self, payload: &SchoolPayload) -> Result<School, AppError>;

    /// Overwrites both name and address.
    async fn update_school(&self, id: i32, payload: &SchoolPayload) -> Result<School, AppError>;

    async fn delete_school(&self, id: i32) -> Result<(), AppError>;

    async fn list_students(&self) -> Result<Vec<Student>, AppError>;

    /// Empty (not an error) when the school has no students or does not exist.
    async fn list_students_by_school(&self, school_id: i32) -> Result<Vec<Student>, AppError>;

    /// Only used by seeding; there is no HTTP route that creates students.
    async fn create_student(&self, student: &NewStudent) -> Result<Student, AppError>;

    /// Removes every student and school and restarts id assignment at 1.
    async fn clear(&self) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn validate_school(payload: &SchoolPayload) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid school: {e}")))
}

pub(crate) fn school_not_found(id: i32) -> AppError {
    AppError::not_found(anyhow::anyhow!("School {id} not found"))
}

pub(crate) fn school_has_students(id: i32) -> AppError {
    AppError::has_dependents(anyhow::anyhow!(
        "School {id} still has students and cannot be deleted"
    ))
}

pub(crate) fn duplicate_school() -> AppError {
    AppError::conflict(anyhow::anyhow!(
        "A school with this name or address already exists"
    ))
}

pub(crate) fn duplicate_student() -> AppError {
    AppError::conflict(anyhow::anyhow!(
        "A student with this name or address already exists"
    ))
}
