use crate::error::AppError;
use bcrypt::{hash, verify};
use sha2::{Digest, Sha256};

/// bcrypt work factor used for every stored password: 2^12 rounds.
/// Fixed; only tests pass a lower cost, directly to the hashing calls.
pub const BCRYPT_COST: u32 = 12;

/// bcrypt reads at most 72 bytes of input. Passwords are reduced to a
/// 64-char hex SHA-256 digest first so every byte of them counts.
fn bcrypt_input(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hashes `password` with a fresh random salt. The output embeds the cost and
/// salt, so no other state is needed to verify it later.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(bcrypt_input(password), cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash. The comparison inside
/// bcrypt is constant-time.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(bcrypt_input(password), hashed_password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}
