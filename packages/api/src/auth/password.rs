//! Argon2id password hashing for the local backend. The remote API hashes
//! server-side, so nothing here runs in remote mode.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) stored in the `passwordHash`
//! field of each local user record.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use store::StoreError;

/// Hash `password` with a fresh salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::transport("Failed to hash password", e))
}

/// Check `password` against a stored PHC string. A mismatch is `Ok(false)`;
/// an unparseable hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, StoreError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| StoreError::transport("Stored password hash is unreadable", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        let err = verify_password("secret1", "plaintext").unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
