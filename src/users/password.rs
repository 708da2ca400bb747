//! Argon2id password hashing.
//!
//! Hashing is CPU bound, so the async wrappers run it on the blocking pool.

use anyhow::{Context, Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::OnceLock;

/// Verified against when the username is unknown, so both failure paths do the same work.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash a password into a PHC string with a fresh random salt.
///
/// # Errors
/// Returns an error if Argon2 rejects the input.
pub fn hash_password_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. Unparseable hashes never verify.
#[must_use]
pub fn verify_password_blocking(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// # Errors
/// Returns an error if hashing fails or the blocking task panics.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .context("password hashing task failed")?
}

/// # Errors
/// Returns an error if the blocking task panics.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash))
        .await
        .context("password verification task failed")
}

/// Burn one verification for an unknown username. Always `false`.
///
/// # Errors
/// Returns an error if the blocking task panics.
pub async fn verify_unknown_user(password: &str) -> Result<bool> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let hash = DUMMY_HASH
            .get_or_init(|| hash_password_blocking("scoutauth-unknown-user").unwrap_or_default());
        let _ = verify_password_blocking(&password, hash);
        false
    })
    .await
    .context("password verification task failed")
}
