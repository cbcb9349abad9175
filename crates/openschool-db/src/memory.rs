//! In-memory [`Store`].
//!
//! Mirrors the PostgreSQL schema: serial ids starting at 1, unique names and
//! addresses per table, and a restricting foreign key from students to
//! schools. Every operation holds the lock for its whole duration, so each
//! one is atomic with respect to the others.

use std::collections::BTreeMap;

use async_trait::async_trait;
use openschool_core::AppError;
use openschool_models::{NewStudent, School, SchoolPayload, Student};
use tokio::sync::RwLock;

use crate::store::{
    Store, duplicate_school, duplicate_student, school_has_students, school_not_found,
    validate_school,
};

#[derive(Debug)]
struct StudentRow {
    name: String,
    address: String,
    school_id: i32,
}

#[derive(Debug, Default)]
struct Tables {
    schools: BTreeMap<i32, School>,
    students: BTreeMap<i32, StudentRow>,
    school_seq: i32,
    student_seq: i32,
}

impl Tables {
    fn school_collides(&self, payload: &SchoolPayload, except: Option<i32>) -> bool {
        self.schools.values().any(|s| {
            Some(s.id) != except && (s.name == payload.name || s.address == payload.address)
        })
    }

    fn project(&self, id: i32, row: &StudentRow) -> Student {
        Student {
            id,
            name: row.name.clone(),
            address: row.address.clone(),
            school: self
                .schools
                .get(&row.school_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_schools(&self) -> Result<Vec<School>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.schools.values().cloned().collect())
    }

    async fn create_school(&self, payload: &SchoolPayload) -> Result<School, AppError> {
        validate_school(payload)?;
        let mut tables = self.tables.write().await;
        if tables.school_collides(payload, None) {
            return Err(duplicate_school());
        }

        tables.school_seq += 1;
        let school = School {
            id: tables.school_seq,
            name: payload.name.clone(),
            address: payload.address.clone(),
        };
        tables.schools.insert(school.id, school.clone());
        Ok(school)
    }

    async fn update_school(&self, id: i32, payload: &SchoolPayload) -> Result<School, AppError> {
        validate_school(payload)?;
        let mut tables = self.tables.write().await;
        if !tables.schools.contains_key(&id) {
            return Err(school_not_found(id));
        }
        if tables.school_collides(payload, Some(id)) {
            return Err(duplicate_school());
        }

        let school = tables
            .schools
            .get_mut(&id)
            .ok_or_else(|| school_not_found(id))?;
        school.name = payload.name.clone();
        school.address = payload.address.clone();
        Ok(school.clone())
    }

    async fn delete_school(&self, id: i32) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.schools.contains_key(&id) {
            return Err(school_not_found(id));
        }
        if tables.students.values().any(|s| s.school_id == id) {
            return Err(school_has_students(id));
        }

        tables.schools.remove(&id);
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .map(|(id, row)| tables.project(*id, row))
            .collect())
    }

    async fn list_students_by_school(&self, school_id: i32) -> Result<Vec<Student>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .filter(|(_, row)| row.school_id == school_id)
            .map(|(id, row)| tables.project(*id, row))
            .collect())
    }

    async fn create_student(&self, student: &NewStudent) -> Result<Student, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.schools.contains_key(&student.school_id) {
            return Err(school_not_found(student.school_id));
        }
        if tables
            .students
            .values()
            .any(|s| s.name == student.name || s.address == student.address)
        {
            return Err(duplicate_student());
        }

        tables.student_seq += 1;
        let id = tables.student_seq;
        let row = StudentRow {
            name: student.name.clone(),
            address: student.address.clone(),
            school_id: student.school_id,
        };
        let projected = tables.project(id, &row);
        tables.students.insert(id, row);
        Ok(projected)
    }

    async fn clear(&self) -> Result<(), AppError> {
        *self.tables.write().await = Tables::default();
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
