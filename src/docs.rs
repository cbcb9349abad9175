use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use openschool_core::ErrorResponse;
use openschool_models::{
    DeletedSchoolResponse, School, SchoolListResponse, SchoolPayload, SchoolResponse, Student,
    StudentListResponse,
};

use crate::modules::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health_check,
        crate::modules::schools::controller::get_schools,
        crate::modules::schools::controller::create_school,
        crate::modules::schools::controller::update_school,
        crate::modules::schools::controller::delete_school,
        crate::modules::schools::controller::get_school_students,
        crate::modules::students::controller::get_students,
    ),
    components(
        schemas(
            School,
            SchoolPayload,
            SchoolListResponse,
            SchoolResponse,
            DeletedSchoolResponse,
            Student,
            StudentListResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Schools", description = "School management endpoints"),
        (name = "Students", description = "Student read endpoints"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "OpenSchool API",
        version = "0.1.0",
        description = "School and student records behind OAuth scopes. Protected endpoints take an `Authorization: Bearer <token>` header.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
