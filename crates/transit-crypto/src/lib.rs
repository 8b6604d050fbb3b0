//! Argon2id hashing helpers shared by the account and OTP flows.
//!
//! Both user passphrases and one-time verification codes are stored as
//! Argon2id PHC strings; nothing secret is ever persisted in clear form.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("hashing failed: {0}")]
    Hash(String),

    #[error("invalid hash encoding: {0}")]
    Encoding(String),
}

/// Hash a secret (passphrase or OTP code) with Argon2id and a fresh salt.
///
/// Returns a PHC-formatted string carrying algorithm, parameters, salt and
/// digest, suitable for direct persistence.
pub fn hash_secret(secret: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CryptoError::Hash(e.to_string()))
}

/// Verify a candidate secret against a stored PHC string.
///
/// A mismatch is `Ok(false)`; only malformed hashes or parameter problems
/// surface as errors. The comparison inside Argon2 is constant-time.
pub fn verify_secret(secret: &str, phc: &str) -> Result<bool, CryptoError> {
    let parsed = PasswordHash::new(phc).map_err(|e| CryptoError::Encoding(e.to_string()))?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CryptoError::Hash(e.to_string())),
    }
}
