//! Error taxonomy shared by every clinic operation.

use thiserror::Error;

use crate::auth::TokenError;
use crate::db::DbError;

/// Failure kinds surfaced to callers of the domain layer.
///
/// Each variant corresponds to one HTTP status class at the boundary:
/// validation → 400, auth/token → 401, not found → 404, the rest → 500.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Auth(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Password hashing error: {0}")]
    Password(String),

    #[error("Datastore unavailable: {0}")]
    Unavailable(String),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

impl ClinicError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// True for failures whose detail must not reach the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Password(_) | Self::Unavailable(_)
        )
    }
}

impl From<rusqlite::Error> for ClinicError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DbError::classify(e))
    }
}
