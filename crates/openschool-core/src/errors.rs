//! Application error type.
//!
//! Every failure that reaches an HTTP response goes through [`AppError`], which
//! renders as a `{code, description}` JSON body with the matching status.
//! Server errors never leak their cause to the client; it is logged instead.

use anyhow::Error;
use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Machine-readable error codes carried in the `code` field.
pub mod codes {
    pub const AUTHORIZATION_HEADER_MISSING: &str = "authorization_header_missing";
    pub const INVALID_HEADER: &str = "invalid_header";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const TOKEN_EXPIRED: &str = "token_expired";
    pub const INVALID_CLAIMS: &str = "invalid_claims";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";
    pub const SCHOOL_HAS_STUDENTS: &str = "school_has_students";
    pub const CONFLICT: &str = "conflict";
    pub const INTERNAL_SERVER_ERROR: &str = "internal_server_error";
}

/// Description returned for every scope denial.
pub const FORBIDDEN_DESCRIPTION: &str = "You don't have permission to access this resource.";

const INTERNAL_DESCRIPTION: &str = "An internal error occurred";

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. `unauthorized`
    pub code: String,
    /// Human-readable description
    pub description: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
        }
    }

    /// 401 with a specific token failure code (see [`codes`]).
    pub fn unauthorized_token<E>(code: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, code, err)
    }

    /// 403 for a caller whose scopes do not cover the operation.
    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            codes::UNAUTHORIZED,
            anyhow::anyhow!(FORBIDDEN_DESCRIPTION),
        )
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, err)
    }

    /// 409 for a uniqueness violation.
    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, err)
    }

    /// 405 for deleting a row that still has dependents.
    pub fn has_dependents<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            codes::SCHOOL_HAS_STUDENTS,
            err,
        )
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_SERVER_ERROR,
            err,
        )
    }

    /// The description that will be sent to the client.
    pub fn description(&self) -> String {
        if self.status.is_server_error() {
            INTERNAL_DESCRIPTION.to_string()
        } else {
            self.error.to_string()
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code.to_string(),
            description: self.description(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.error)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status.as_u16(),
                code = self.code,
                error = %self.error,
                "Request failed with server error"
            );
        }

        (self.status, Json(self.to_body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal(err)
    }
}

// Ids in paths are integers; anything else does not name a resource.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::not_found(anyhow::anyhow!(
            "Resource not found: {}",
            rejection.body_text()
        ))
    }
}
