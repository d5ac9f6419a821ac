//! Staff authentication: registration, credential checks and session tokens.

mod password;
mod token;

pub use password::*;
pub use token::*;

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{LoginInput, SignupInput, User};

/// Message for any failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

/// An authenticated session decoded from a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    /// Unix seconds
    pub expires_at: i64,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            expires_at: claims.exp,
        }
    }
}

/// Create an account. A taken email surfaces as a constraint error.
pub fn register(db: &Database, input: SignupInput) -> ClinicResult<User> {
    let signup = input.validate()?;
    let hash = hash_password(&signup.password)?;
    let user = db.insert_user(&signup.email, &signup.name, &hash)?;
    info!(user_id = user.id, "Registered user");
    Ok(user)
}

/// Check email and password. Unknown email and wrong password are
/// indistinguishable to the caller.
pub fn authenticate(db: &Database, input: LoginInput) -> ClinicResult<User> {
    let (email, password) = input.validate()?;

    let Some(stored) = db.find_user_by_email(&email)? else {
        warn!("Login rejected: unknown email");
        return Err(ClinicError::Auth(INVALID_CREDENTIALS.into()));
    };
    if !verify_password(&password, &stored.password_hash)? {
        warn!(user_id = stored.user.id, "Login rejected: wrong password");
        return Err(ClinicError::Auth(INVALID_CREDENTIALS.into()));
    }
    Ok(stored.user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str) -> SignupInput {
        SignupInput {
            email: Some(email.into()),
            password: Some("s3cret".into()),
            name: Some("Paz".into()),
        }
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn test_register_then_authenticate() {
        let db = Database::open_in_memory().unwrap();
        let user = register(&db, signup("vet@clinic.com")).unwrap();

        let logged_in = authenticate(&db, login("VET@clinic.com", "s3cret")).unwrap();
        assert_eq!(logged_in, user);
    }

    #[test]
    fn test_failures_share_one_message() {
        let db = Database::open_in_memory().unwrap();
        register(&db, signup("vet@clinic.com")).unwrap();

        for input in [login("vet@clinic.com", "nope"), login("ghost@clinic.com", "s3cret")] {
            let err = authenticate(&db, input).unwrap_err();
            assert!(matches!(err, ClinicError::Auth(ref m) if m == INVALID_CREDENTIALS));
        }
    }

    #[test]
    fn test_duplicate_signup_is_internal() {
        let db = Database::open_in_memory().unwrap();
        register(&db, signup("vet@clinic.com")).unwrap();
        assert!(register(&db, signup("vet@clinic.com")).unwrap_err().is_internal());
    }

    #[test]
    fn test_session_from_claims() {
        let signer = TokenSigner::new(b"k".to_vec(), 60);
        let token = signer.issue_at(3, "vet@clinic.com", 1_000).unwrap();
        let session = Session::from(signer.verify_at(&token, 1_001).unwrap());
        assert_eq!(session.user_id, 3);
        assert_eq!(session.expires_at, 1_060);
    }
}
