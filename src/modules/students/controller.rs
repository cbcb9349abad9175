use axum::{Json, extract::State};
use openschool_core::{AppError, ErrorResponse};
use openschool_models::StudentListResponse;

use crate::middleware::auth::RequireGetStudents;
use crate::state::AppState;

use super::service::StudentService;

#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "All students ordered by id", body = StudentListResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Token lacks get:students", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = ["get:students"]))
)]
pub async fn get_students(
    State(state): State<AppState>,
    _auth: RequireGetStudents,
) -> Result<Json<StudentListResponse>, AppError> {
    let students = StudentService::list_students(state.store.as_ref()).await?;
    Ok(Json(StudentListResponse { students }))
}
