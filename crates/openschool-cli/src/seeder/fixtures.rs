//! The fixed development data set: two schools with two students each.

use std::time::Instant;

use openschool_core::AppError;
use openschool_db::Store;
use openschool_models::{NewStudent, SchoolPayload};
use tracing::info;

use super::models::SeedSummary;

pub const FIXTURE_SCHOOLS: &[(&str, &str)] = &[
    ("School Name 1", "1 School Street"),
    ("School Name 2", "2 School Street"),
];

/// `(name, address, index into FIXTURE_SCHOOLS)`
pub const FIXTURE_STUDENTS: &[(&str, &str, usize)] = &[
    ("Student 1", "1 Main Street", 0),
    ("Student 2", "2 Main Street", 0),
    ("Student 3", "3 Main Street", 1),
    ("Student 4", "4 Main Street", 1),
];

/// Inserts the fixture schools and students.
///
/// Students are attached to the ids the store assigns, so this works on a
/// non-empty store too. Fails with 409 if the fixtures are already present.
pub async fn seed_fixtures(store: &dyn Store) -> Result<SeedSummary, AppError> {
    let start_time = Instant::now();

    let mut school_ids = Vec::with_capacity(FIXTURE_SCHOOLS.len());
    for (name, address) in FIXTURE_SCHOOLS {
        let school = store
            .create_school(&SchoolPayload {
                name: name.to_string(),
                address: address.to_string(),
            })
            .await?;
        school_ids.push(school.id);
    }

    for (name, address, school) in FIXTURE_STUDENTS {
        store
            .create_student(&NewStudent::new(*name, *address, school_ids[*school]))
            .await?;
    }

    let summary = SeedSummary {
        schools: FIXTURE_SCHOOLS.len(),
        students: FIXTURE_STUDENTS.len(),
        skipped: 0,
    };
    info!(
        schools = summary.schools,
        students = summary.students,
        elapsed = ?start_time.elapsed(),
        "Seeded fixture data"
    );

    Ok(summary)
}
