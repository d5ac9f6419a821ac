//! Staff user accounts for the management panel.

use serde::{Deserialize, Serialize};

use super::fields::present;
use crate::error::{ClinicError, ClinicResult};

/// Public view of an account. The password hash never leaves the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// A user row together with its stored Argon2 PHC string.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated signup fields. The password is still plaintext here.
#[derive(Debug, Clone)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl SignupInput {
    pub fn validate(self) -> ClinicResult<Signup> {
        // Passwords are not trimmed; only emptiness is checked.
        let password = self.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password), Some(name)) =
            (present(self.email), password, present(self.name))
        else {
            return Err(ClinicError::validation(
                "Email, contraseña y nombre son obligatorios",
            ));
        };
        Ok(Signup {
            email: email.to_lowercase(),
            password,
            name,
        })
    }
}

impl LoginInput {
    /// Returns `(email, password)`.
    pub fn validate(self) -> ClinicResult<(String, String)> {
        let password = self.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (present(self.email), password) else {
            return Err(ClinicError::validation("Email y contraseña son obligatorios"));
        };
        Ok((email.to_lowercase(), password))
    }
}
