//! Student and animal database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{Animal, NewStudent, Student, StudentPatch};

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

fn animal_from_row(row: &Row<'_>) -> rusqlite::Result<Animal> {
    Ok(Animal {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

impl Database {
    pub fn list_students(&self) -> ClinicResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM students ORDER BY id")?;
        let rows = stmt.query_map([], student_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_student(&self, id: i64) -> ClinicResult<Student> {
        self.conn
            .query_row(
                "SELECT id, name, email FROM students WHERE id = ?",
                [id],
                student_from_row,
            )
            .optional()?
            .ok_or_else(|| ClinicError::not_found(Student::NOT_FOUND))
    }

    pub fn create_student(&self, new: &NewStudent) -> ClinicResult<Student> {
        self.conn.execute(
            "INSERT INTO students (name, email) VALUES (?1, ?2)",
            params![new.name, new.email],
        )?;
        self.get_student(self.conn.last_insert_rowid())
    }

    pub fn update_student(&self, id: i64, patch: StudentPatch) -> ClinicResult<Student> {
        let mut student = self.get_student(id)?;
        if let Some(name) = patch.name {
            student.name = name;
        }
        if let Some(email) = patch.email {
            student.email = email;
        }

        self.conn.execute(
            "UPDATE students SET name = ?2, email = ?3 WHERE id = ?1",
            params![student.id, student.name, student.email],
        )?;
        Ok(student)
    }

    pub fn delete_student(&self, id: i64) -> ClinicResult<()> {
        let removed = self.conn.execute("DELETE FROM students WHERE id = ?", [id])?;
        if removed == 0 {
            return Err(ClinicError::not_found(Student::NOT_FOUND));
        }
        Ok(())
    }

    pub fn list_animals(&self) -> ClinicResult<Vec<Animal>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM animals ORDER BY id")?;
        let rows = stmt.query_map([], animal_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_animal(&self, id: i64) -> ClinicResult<Animal> {
        self.conn
            .query_row("SELECT id, name FROM animals WHERE id = ?", [id], animal_from_row)
            .optional()?
            .ok_or_else(|| ClinicError::not_found(Animal::NOT_FOUND))
    }

    /// Insert an animal. Names are unique.
    pub fn create_animal(&self, name: &str) -> ClinicResult<Animal> {
        self.conn
            .execute("INSERT INTO animals (name) VALUES (?)", [name])?;
        self.get_animal(self.conn.last_insert_rowid())
    }

    pub fn rename_animal(&self, id: i64, name: &str) -> ClinicResult<Animal> {
        let updated = self
            .conn
            .execute("UPDATE animals SET name = ?2 WHERE id = ?1", params![id, name])?;
        if updated == 0 {
            return Err(ClinicError::not_found(Animal::NOT_FOUND));
        }
        self.get_animal(id)
    }

    pub fn delete_animal(&self, id: i64) -> ClinicResult<()> {
        let removed = self.conn.execute("DELETE FROM animals WHERE id = ?", [id])?;
        if removed == 0 {
            return Err(ClinicError::not_found(Animal::NOT_FOUND));
        }
        Ok(())
    }
}
