//! PostgreSQL-backed [`Store`].

use async_trait::async_trait;
use openschool_core::AppError;
use openschool_models::{NewStudent, School, SchoolPayload, Student};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use crate::store::{
    Store, duplicate_school, duplicate_student, school_has_students, school_not_found,
    validate_school,
};

const STUDENT_COLUMNS: &str = "st.id, st.name, st.address, sc.name AS school";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_check_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_check_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "schools"))]
    async fn list_schools(&self) -> Result<Vec<School>, AppError> {
        sqlx::query_as::<_, School>("SELECT id, name, address FROM schools ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching schools");
                AppError::from(e)
            })
    }

    #[instrument(skip(self, payload), fields(db.operation = "INSERT", db.table = "schools"))]
    async fn create_school(&self, payload: &SchoolPayload) -> Result<School, AppError> {
        validate_school(payload)?;

        sqlx::query_as::<_, School>(
            "INSERT INTO schools (name, address) VALUES ($1, $2)
             RETURNING id, name, address",
        )
        .bind(&payload.name)
        .bind(&payload.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return duplicate_school();
            }
            if is_check_violation(&e) {
                return AppError::bad_request(e);
            }
            error!(error = %e, school.name = %payload.name, "Database error creating school");
            AppError::from(e)
        })
    }

    #[instrument(skip(self, payload), fields(school.id = %id, db.operation = "UPDATE", db.table = "schools"))]
    async fn update_school(&self, id: i32, payload: &SchoolPayload) -> Result<School, AppError> {
        validate_school(payload)?;

        sqlx::query_as::<_, School>(
            "UPDATE schools SET name = $2, address = $3 WHERE id = $1
             RETURNING id, name, address",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return duplicate_school();
            }
            if is_check_violation(&e) {
                return AppError::bad_request(e);
            }
            error!(school.id = %id, error = %e, "Database error updating school");
            AppError::from(e)
        })?
        .ok_or_else(|| school_not_found(id))
    }

    #[instrument(skip(self), fields(school.id = %id, db.operation = "DELETE", db.table = "schools"))]
    async fn delete_school(&self, id: i32) -> Result<(), AppError> {
        // The child check and the delete are one statement; the RESTRICT
        // foreign key catches a student inserted concurrently.
        let result = sqlx::query(
            "DELETE FROM schools WHERE id = $1
             AND NOT EXISTS (SELECT 1 FROM students WHERE school_id = $1)",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return school_has_students(id);
            }
            error!(school.id = %id, error = %e, "Database error deleting school");
            AppError::from(e)
        })?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM schools WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            debug!(school.id = %id, "School still has students");
            Err(school_has_students(id))
        } else {
            debug!(school.id = %id, "School not found for deletion");
            Err(school_not_found(id))
        }
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "students"))]
    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let query = format!(
            "SELECT {STUDENT_COLUMNS} FROM students st
             INNER JOIN schools sc ON sc.id = st.school_id
             ORDER BY st.id"
        );

        sqlx::query_as::<_, Student>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching students");
                AppError::from(e)
            })
    }

    #[instrument(skip(self), fields(school.id = %school_id, db.operation = "SELECT", db.table = "students"))]
    async fn list_students_by_school(&self, school_id: i32) -> Result<Vec<Student>, AppError> {
        let query = format!(
            "SELECT {STUDENT_COLUMNS} FROM students st
             INNER JOIN schools sc ON sc.id = st.school_id
             WHERE st.school_id = $1
             ORDER BY st.id"
        );

        sqlx::query_as::<_, Student>(&query)
            .bind(school_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(school.id = %school_id, error = %e, "Database error fetching school students");
                AppError::from(e)
            })
    }

    #[instrument(skip(self, student), fields(school.id = %student.school_id, db.operation = "INSERT", db.table = "students"))]
    async fn create_student(&self, student: &NewStudent) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            "WITH inserted AS (
                 INSERT INTO students (name, address, school_id) VALUES ($1, $2, $3)
                 RETURNING id, name, address, school_id
             )
             SELECT st.id, st.name, st.address, sc.name AS school
             FROM inserted st INNER JOIN schools sc ON sc.id = st.school_id",
        )
        .bind(&student.name)
        .bind(&student.address)
        .bind(student.school_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return duplicate_student();
            }
            if is_foreign_key_violation(&e) {
                return school_not_found(student.school_id);
            }
            error!(error = %e, "Database error creating student");
            AppError::from(e)
        })
    }

    #[instrument(skip(self), fields(db.operation = "TRUNCATE"))]
    async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("TRUNCATE students, schools RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
