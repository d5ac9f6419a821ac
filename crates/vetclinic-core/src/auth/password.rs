//! Argon2 password hashing.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{ClinicError, ClinicResult};

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> ClinicResult<String> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| ClinicError::Password(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClinicError::Password(e.to_string()))
}

/// Check a password against a stored PHC string. A mismatch is `Ok(false)`;
/// a corrupt hash is an error.
pub fn verify_password(password: &str, phc: &str) -> ClinicResult<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| ClinicError::Password(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ClinicError::Password(e.to_string())),
    }
}
