use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::AuthServiceError;

/// Argon2-hash a secret (signup password or OTP code). OTP codes are short,
/// so anything cheaper than a password-grade hash would be offline-guessable
/// from a leaked store.
pub fn hash_secret(secret: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("argon2 hash: {e}")))
}

/// Check a candidate secret against a stored hash. A malformed stored hash
/// is an internal error, not a mismatch.
pub fn verify_secret(candidate: &str, stored_hash: &str) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("stored hash malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}
