//! Authorization guard.
//!
//! Pure decisions over a verified [`Claims`]. Token presence and validity are
//! checked before any of this runs, so a missing token never reaches a scope
//! check.

use openschool_core::{AppError, scopes};

use crate::claims::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    fn from_bool(allowed: bool) -> Self {
        if allowed { Decision::Allow } else { Decision::Deny }
    }

    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    /// `Deny` becomes a 403 with code `unauthorized`.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::forbidden()),
        }
    }
}

/// ALLOW iff `scope` is granted.
pub fn authorize_scope(claims: &Claims, scope: &str) -> Decision {
    Decision::from_bool(claims.has_scope(scope))
}

/// ALLOW iff `global` is granted, or the scope `{prefix}-{id}` is granted.
pub fn authorize_resource_scope(claims: &Claims, global: &str, prefix: &str, id: i32) -> Decision {
    Decision::from_bool(
        claims.has_scope(global) || claims.has_scope(&scopes::resource_scope(prefix, id)),
    )
}

pub fn require_scope(claims: &Claims, scope: &str) -> Result<(), AppError> {
    authorize_scope(claims, scope).into_result()
}

/// Reading the students of one school: `get:students` or `get:students-{id}`.
pub fn require_school_students_scope(claims: &Claims, school_id: i32) -> Result<(), AppError> {
    authorize_resource_scope(
        claims,
        scopes::GET_STUDENTS,
        scopes::GET_STUDENTS_PREFIX,
        school_id,
    )
    .into_result()
}
