//! Staff account storage.

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{StoredUser, User};

fn stored_user_from_row(row: &Row<'_>) -> rusqlite::Result<StoredUser> {
    Ok(StoredUser {
        user: User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
        },
        password_hash: row.get(3)?,
    })
}

impl Database {
    /// Insert a user with an already-hashed password. Emails are unique.
    pub fn insert_user(&self, email: &str, name: &str, password_hash: &str) -> ClinicResult<User> {
        self.conn.execute(
            "INSERT INTO users (email, name, password_hash) VALUES (?1, ?2, ?3)",
            params![email, name, password_hash],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            email: email.to_string(),
            name: name.to_string(),
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> ClinicResult<Option<StoredUser>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, name, password_hash FROM users WHERE email = ?",
                [email],
                stored_user_from_row,
            )
            .optional()?)
    }

    pub fn get_user(&self, id: i64) -> ClinicResult<User> {
        self.conn
            .query_row(
                "SELECT id, email, name, password_hash FROM users WHERE id = ?",
                [id],
                stored_user_from_row,
            )
            .optional()?
            .map(|stored| stored.user)
            .ok_or_else(|| ClinicError::not_found("Usuario no encontrado"))
    }
}
