//! Password Service
//!
//! Argon2id salted hashing and verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{ContentError, Result};

#[derive(Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ContentError::internal(format!("password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Returns false on mismatch; errors only on a malformed stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| ContentError::internal(format!("stored hash is malformed: {}", e)))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let service = PasswordService::new();
        let hash = service.hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("hunter2", &hash).unwrap());
        assert!(!service.verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = PasswordService::new();
        let a = service.hash_password("same").unwrap();
        let b = service.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_errors() {
        let service = PasswordService::new();
        assert!(service.verify_password("x", "not-a-phc-string").is_err());
    }
}
