use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use openschool_core::{AppError, ErrorResponse};
use openschool_models::{
    DeletedSchoolResponse, School, SchoolListResponse, SchoolPayload, SchoolResponse,
    StudentListResponse,
};

use crate::middleware::auth::{AuthUser, RequireModifySchool, RequirePostSchool, deny};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::SchoolService;

#[utoipa::path(
    get,
    path = "/schools",
    responses(
        (status = 200, description = "All schools ordered by id", body = SchoolListResponse)
    ),
    tag = "Schools"
)]
pub async fn get_schools(
    State(state): State<AppState>,
) -> Result<Json<SchoolListResponse>, AppError> {
    let schools = SchoolService::list_schools(state.store.as_ref()).await?;
    Ok(Json(SchoolListResponse { schools }))
}

#[utoipa::path(
    post,
    path = "/schools",
    request_body = SchoolPayload,
    responses(
        (status = 200, description = "School created", body = School),
        (status = 400, description = "Missing, empty or too long name/address", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Token lacks post:school", body = ErrorResponse),
        (status = 409, description = "Name or address already in use", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = ["post:school"]))
)]
pub async fn create_school(
    State(state): State<AppState>,
    _auth: RequirePostSchool,
    ValidatedJson(payload): ValidatedJson<SchoolPayload>,
) -> Result<Json<School>, AppError> {
    let school = SchoolService::create_school(state.store.as_ref(), &payload).await?;
    Ok(Json(school))
}

#[utoipa::path(
    patch,
    path = "/schools/{id}",
    params(
        ("id" = i32, Path, description = "School ID")
    ),
    request_body = SchoolPayload,
    responses(
        (status = 200, description = "School updated", body = SchoolResponse),
        (status = 400, description = "Missing, empty or too long name/address", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Token lacks modify:school", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 409, description = "Name or address already in use", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = ["modify:school"]))
)]
pub async fn update_school(
    State(state): State<AppState>,
    _auth: RequireModifySchool,
    id: Result<Path<i32>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<SchoolPayload>,
) -> Result<Json<SchoolResponse>, AppError> {
    let Path(id) = id?;
    let school = SchoolService::update_school(state.store.as_ref(), id, &payload).await?;
    Ok(Json(SchoolResponse { school }))
}

#[utoipa::path(
    delete,
    path = "/schools/{id}",
    params(
        ("id" = i32, Path, description = "School ID")
    ),
    responses(
        (status = 200, description = "School deleted", body = DeletedSchoolResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Token lacks modify:school", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 405, description = "School still has students", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = ["modify:school"]))
)]
pub async fn delete_school(
    State(state): State<AppState>,
    _auth: RequireModifySchool,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedSchoolResponse>, AppError> {
    let Path(id) = id?;
    SchoolService::delete_school(state.store.as_ref(), id).await?;
    Ok(Json(DeletedSchoolResponse { school_id: id }))
}

#[utoipa::path(
    get,
    path = "/schools/{id}/students",
    params(
        ("id" = i32, Path, description = "School ID")
    ),
    responses(
        (status = 200, description = "Students of the school (empty if none)", body = StudentListResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Token lacks get:students and get:students-{id}", body = ErrorResponse),
        (status = 404, description = "Non-numeric school id", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = ["get:students", "get:students-{id}"]))
)]
pub async fn get_school_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<StudentListResponse>, AppError> {
    let Path(id) = id?;

    if let Err(err) = openschool_auth::guard::require_school_students_scope(&auth_user.0, id) {
        deny(&auth_user, &openschool_core::scopes::students_of_school(id));
        return Err(err);
    }

    let students = StudentService::list_students_by_school(state.store.as_ref(), id).await?;
    Ok(Json(StudentListResponse { students }))
}
