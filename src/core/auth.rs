//! Email/password authentication and credential hashing.
//!
//! Authentication looks the identity up by email and verifies the
//! password against its stored Argon2 hash. Unknown email and wrong
//! password both come back as `Ok(None)` so callers cannot distinguish
//! the two cases.

use crate::entities::{UserProfile, user_profile};
use crate::errors::{Error, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sea_orm::{DatabaseConnection, prelude::*};
use tracing::{debug, warn};

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Credential {
            message: format!("failed to hash password: {e}"),
        })?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored hash.
///
/// # Errors
/// Returns [`Error::Credential`] only when the stored hash itself is
/// malformed; a simple mismatch is `Ok(false)`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| Error::Credential {
        message: format!("stored password hash is invalid: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Authenticates an identity by email and password.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user_profile::Model>> {
    debug!(email, "attempting to authenticate user");

    let user = UserProfile::find()
        .filter(user_profile::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?;

    let Some(user) = user else {
        warn!(email, "user not found");
        return Ok(None);
    };

    if verify_password(password, &user.password_hash)? {
        debug!(user_id = user.id, "user authenticated successfully");
        Ok(Some(user))
    } else {
        warn!(user_id = user.id, "password mismatch");
        Ok(None)
    }
}
