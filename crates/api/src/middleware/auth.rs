//! # Authentication Module
//!
//! Staff logins are checked against Argon2 hashes stored in the
//! `staff_accounts` table. The login key also decides the dashboard scope,
//! see [`sorriso_core::filters::StaffScope`].

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use eyre::{Result, eyre};
use sorriso_core::{
    errors::{ClinicError, ClinicResult},
    models::profile::StaffLoginResponse,
};
use sqlx::PgPool;
use std::sync::LazyLock;

// Verified against when the login is unknown so both paths cost one Argon2 run.
static UNKNOWN_LOGIN_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("sorriso-unknown-login").ok());

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is in PHC
/// string format, so it carries its own parameters.
///
/// # Example
///
/// ```rust
/// use sorriso_api::middleware::auth::{hash_password, verify_password};
///
/// let hashed = hash_password("sorriso123").unwrap();
/// assert!(verify_password(&hashed, "sorriso123").unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash. A malformed hash is an error,
/// a wrong password is `Ok(false)`.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn verify_unknown_login(password: &str) -> bool {
    UNKNOWN_LOGIN_HASH
        .as_deref()
        .is_some_and(|hash| verify_password(hash, password).unwrap_or(false))
}

/// Authenticates a staff member and returns what their dashboard may show.
///
/// Unknown users and wrong passwords produce the same error.
pub async fn authenticate_staff(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> ClinicResult<StaffLoginResponse> {
    let username = username.trim().to_lowercase();
    let rejected = || ClinicError::Authentication("invalid username or password".to_string());

    let Some(account) = sorriso_db::repositories::staff::get_staff_account(pool, &username)
        .await
        .map_err(ClinicError::Database)?
    else {
        verify_unknown_login(password);
        tracing::info!("Rejected staff login for {}", username);
        return Err(rejected());
    };

    if !verify_password(&account.password_hash, password).map_err(ClinicError::Database)? {
        tracing::info!("Rejected staff login for {}", username);
        return Err(rejected());
    }

    Ok(StaffLoginResponse {
        username: account.username,
        is_master: account.is_master,
        clinic_name: account.clinic_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
    }

    #[test]
    fn verifies_matching_password_only() {
        let hash = hash_password("secret").unwrap();
        assert!(verify_password(&hash, "secret").unwrap());
        assert!(!verify_password(&hash, "Secret").unwrap());
    }

    #[test]
    fn unknown_logins_still_run_a_verification() {
        let hash = UNKNOWN_LOGIN_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!verify_unknown_login("gerencia123"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("not-a-hash", "secret").is_err());
    }
}
