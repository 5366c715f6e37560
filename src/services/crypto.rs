use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::DomainError;

/// Hash a plaintext password with Argon2id, returning the PHC string.
pub fn hash_password(plaintext: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| DomainError::Internal(format!("Password hashing error: {}", e)))?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored PHC hash string.
/// Any parse or mismatch failure is reported as `false`.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hash1 = hash_password("password").unwrap();
        let hash2 = hash_password("password").unwrap();

        // Random salts make identical inputs diverge
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
