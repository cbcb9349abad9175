//! OAuth scope names for the OpenSchool API.
//!
//! The identity provider issues these strings verbatim in the token's `scope`
//! claim. Use the constants instead of string literals.
//!
//! # Example
//!
//! ```ignore
//! use openschool_core::scopes;
//!
//! if claims.has_scope(scopes::POST_SCHOOL) {
//!     // Create school
//! }
//!
//! // Principal of school 2
//! assert_eq!(scopes::students_of_school(2), "get:students-2");
//! ```

// =============================================================================
// Schools
// =============================================================================

/// Permission to create schools
pub const POST_SCHOOL: &str = "post:school";
/// Permission to update and delete schools
pub const MODIFY_SCHOOL: &str = "modify:school";

// =============================================================================
// Students
// =============================================================================

/// Permission to read every student (superintendent)
pub const GET_STUDENTS: &str = "get:students";

/// Prefix of the per-school student read scope
pub const GET_STUDENTS_PREFIX: &str = "get:students";

/// Builds a resource-parameterized scope: `{prefix}-{id}`.
pub fn resource_scope(prefix: &str, id: i32) -> String {
    format!("{prefix}-{id}")
}

/// Scope granting read access to the students of one school (principal).
pub fn students_of_school(school_id: i32) -> String {
    resource_scope(GET_STUDENTS_PREFIX, school_id)
}

/// All fixed scopes, in the order the identity provider lists them.
pub const ALL: &[&str] = &[GET_STUDENTS, POST_SCHOOL, MODIFY_SCHOOL];
