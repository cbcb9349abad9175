//! Fake school and student generation.
//!
//! Generation runs in parallel with Rayon; inserts go through the store one
//! row at a time so its uniqueness rules apply. Rows that collide with
//! existing data are skipped and counted.

use fake::Fake;
use fake::faker::address::en::*;
use fake::faker::name::en::{FirstName, LastName};
use openschool_core::{AppError, codes};
use openschool_db::Store;
use openschool_models::{NewStudent, SchoolPayload};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

use super::models::{RandomSeedConfig, SchoolSeed, SeedSummary, StudentSeed};

// Names and addresses are capped at 80 characters.
const MAX_LEN: usize = 80;

fn clamp(mut value: String) -> String {
    if value.len() > MAX_LEN {
        let mut end = MAX_LEN;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        value.truncate(end);
    }
    value
}

/// Generates school data in parallel using Rayon.
///
/// The index is embedded in name and address so one batch never collides
/// with itself.
pub fn generate_schools(count: usize) -> Vec<SchoolSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let city: String = CityName().fake();
            let street: String = StreetName().fake();
            let building: String = BuildingNumber().fake();

            SchoolSeed {
                name: clamp(format!("{city} School {}", i + 1)),
                address: clamp(format!("{building} {street}, Unit {}", i + 1)),
            }
        })
        .collect()
}

/// Generates student data in parallel using Rayon.
pub fn generate_students(count: usize) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let n = i + 1;
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let street: String = StreetName().fake();

            StudentSeed {
                name: clamp(format!("{first} {last} {n}")),
                address: clamp(format!("{n} {street}")),
            }
        })
        .collect()
}

fn is_conflict(err: &AppError) -> bool {
    err.code == codes::CONFLICT
}

/// Seeds random schools, each with `students_per_school` students.
pub async fn seed_random(
    store: &dyn Store,
    config: RandomSeedConfig,
) -> Result<SeedSummary, AppError> {
    let start_time = Instant::now();
    info!(
        schools = config.num_schools,
        students = config.total_students(),
        "Seeding random data"
    );

    let schools = generate_schools(config.num_schools);
    let students = generate_students(config.total_students());
    let mut summary = SeedSummary::default();

    for (i, school_seed) in schools.into_iter().enumerate() {
        let per_school = config.students_per_school;
        let school_students = &students[i * per_school..(i + 1) * per_school];

        let school = match store
            .create_school(&SchoolPayload {
                name: school_seed.name,
                address: school_seed.address,
            })
            .await
        {
            Ok(school) => school,
            Err(e) if is_conflict(&e) => {
                warn!(error = %e, "Skipping duplicate school");
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        summary.schools += 1;

        for student in school_students {
            match store
                .create_student(&NewStudent::new(
                    student.name.clone(),
                    student.address.clone(),
                    school.id,
                ))
                .await
            {
                Ok(_) => summary.students += 1,
                Err(e) if is_conflict(&e) => summary.skipped += 1,
                Err(e) => return Err(e),
            }
        }
    }

    info!(
        schools = summary.schools,
        students = summary.students,
        skipped = summary.skipped,
        elapsed = ?start_time.elapsed(),
        "Seeded random data"
    );

    Ok(summary)
}
