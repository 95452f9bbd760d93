//! # Password Hashing
//!
//! Password hashing and verification using Argon2 with a random per-digest salt.
//! Digests are PHC strings, so the algorithm parameters travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Failed to parse password digest: {0}")]
    MalformedDigest(String),
}

/// Hash a password using the Argon2 algorithm.
///
/// Length and strength rules belong to the caller; this only fails when the
/// hasher itself does.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Hash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against an Argon2 digest.
///
/// A mismatch is `Ok(false)`; only a digest that cannot be parsed is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::MalformedDigest(e.to_string()))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
