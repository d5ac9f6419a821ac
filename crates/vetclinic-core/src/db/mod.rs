//! Database layer for the clinic.
//!
//! Every repository operation lives in an `impl Database` block in the file
//! of the entity it serves. Reads take `&self`; operations that must be
//! atomic (cascading deletes, invoices, veterinarian specialty sets) take
//! `&mut self` and run inside one transaction.

mod appointments;
mod cascade;
mod clients;
mod demo;
#[cfg(test)]
mod fixtures;
mod invoices;
mod pets;
mod schema;
mod treatments;
mod users;
mod veterinarians;

pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;

use crate::error::ClinicResult;
use crate::models::ClinicSummary;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Wrap a SQLite error, separating constraint violations from the rest.
    pub fn classify(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
                Self::Constraint(msg.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => Self::Sqlite(e),
        }
    }
}

/// Database connection wrapper.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed. `:memory:` opens a private
    /// in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Row counts and billed total for the dashboard.
    pub fn summary(&self) -> ClinicResult<ClinicSummary> {
        let count = |table: &str| -> ClinicResult<i64> {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
        };

        Ok(ClinicSummary {
            clients: count("clients")?,
            pets: count("pets")?,
            veterinarians: count("veterinarians")?,
            appointments: count("appointments")?,
            treatments: count("treatments")?,
            invoices: count("invoices")?,
            billed_total: self.conn.query_row(
                "SELECT COALESCE(SUM(total), 0.0) FROM invoices",
                [],
                |row| row.get(0),
            )?,
        })
    }
}
