//! Seed data and configuration for random seeding.

/// Seed data for creating a school.
#[derive(Debug, Clone)]
pub struct SchoolSeed {
    pub name: String,
    pub address: String,
}

/// Seed data for creating a student; the school is assigned at insert time.
#[derive(Debug, Clone)]
pub struct StudentSeed {
    pub name: String,
    pub address: String,
}

/// Configuration for `seed-random`.
#[derive(Debug, Clone)]
pub struct RandomSeedConfig {
    pub num_schools: usize,
    pub students_per_school: usize,
}

impl Default for RandomSeedConfig {
    fn default() -> Self {
        Self {
            num_schools: 5,
            students_per_school: 20,
        }
    }
}

impl RandomSeedConfig {
    /// Creates a configuration with the specified number of schools.
    pub fn new(num_schools: usize) -> Self {
        Self {
            num_schools,
            ..Default::default()
        }
    }

    pub fn with_students(mut self, students_per_school: usize) -> Self {
        self.students_per_school = students_per_school;
        self
    }

    pub fn total_students(&self) -> usize {
        self.num_schools * self.students_per_school
    }
}

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub schools: usize,
    pub students: usize,
    /// Rows rejected as duplicates of existing data
    pub skipped: usize,
}
