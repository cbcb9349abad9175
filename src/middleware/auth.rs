use anyhow::anyhow;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use openschool_auth::Claims;
use openschool_core::{AppError, codes};

use crate::state::AppState;

/// Extractor that verifies the bearer token and provides its claims.
///
/// Token problems are 401s and are reported before any scope check:
/// a request without a token never sees a 403.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.0.sub
    }
}

fn header_rejection(rejection: TypedHeaderRejection) -> AppError {
    if rejection.is_missing() {
        AppError::unauthorized_token(
            codes::AUTHORIZATION_HEADER_MISSING,
            anyhow!("Authorization header is expected."),
        )
    } else {
        AppError::unauthorized_token(
            codes::INVALID_HEADER,
            anyhow!("Authorization header must be a bearer token."),
        )
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(header_rejection)?;

        let token = bearer.token();
        if token.is_empty() || token.split_whitespace().count() != 1 {
            return Err(AppError::unauthorized_token(
                codes::INVALID_HEADER,
                anyhow!("Authorization header must be a bearer token."),
            ));
        }

        let claims = state.verifier.verify(token).await?;
        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that admits only callers holding one scope.
///
/// Denials are logged and counted before the 403 is returned.
#[macro_export]
macro_rules! require_scope {
    ($name:ident, $scope:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = openschool_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if let Err(err) = openschool_auth::guard::require_scope(&auth_user.0, $scope) {
                    $crate::middleware::auth::deny(&auth_user, $scope);
                    return Err(err);
                }

                Ok($name(auth_user))
            }
        }
    };
}

/// Records a denied authorization.
pub fn deny(auth_user: &AuthUser, required: &str) {
    tracing::warn!(
        user.sub = %auth_user.subject(),
        scope.required = %required,
        "Authorization denied"
    );
    crate::metrics::track_authorization_denied(required);
}

require_scope!(RequirePostSchool, openschool_core::scopes::POST_SCHOOL);
require_scope!(RequireModifySchool, openschool_core::scopes::MODIFY_SCHOOL);
require_scope!(RequireGetStudents, openschool_core::scopes::GET_STUDENTS);
