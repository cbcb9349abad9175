use openschool_core::AppError;
use openschool_db::Store;
use openschool_models::Student;
use tracing::{debug, instrument};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(store), fields(db.operation = "SELECT", db.table = "students"))]
    pub async fn list_students(store: &dyn Store) -> Result<Vec<Student>, AppError> {
        let students = store.list_students().await?;
        debug!(count = students.len(), "Fetched students");
        Ok(students)
    }

    /// Empty when the school has no students or does not exist.
    #[instrument(skip(store), fields(school.id = %school_id, db.operation = "SELECT", db.table = "students"))]
    pub async fn list_students_by_school(
        store: &dyn Store,
        school_id: i32,
    ) -> Result<Vec<Student>, AppError> {
        let students = store.list_students_by_school(school_id).await?;
        debug!(count = students.len(), "Fetched students of school");
        Ok(students)
    }
}
