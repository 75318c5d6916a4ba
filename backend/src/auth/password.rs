//! Password hashing using argon2id
//!
//! Hashing is CPU-bound; async callers go through the `*_async` variants,
//! which run on the blocking pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt (PHC string format)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash
    ///
    /// A malformed stored hash is an error, a wrong password is `Ok(false)`.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("password123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify("password123", &hash).unwrap());
        assert!(!PasswordService::verify("password124", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hash1 = PasswordService::hash("password123").unwrap();
        let hash2 = PasswordService::hash("password123").unwrap();

        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify("password123", &hash2).unwrap());
    }

    #[test]
    fn test_plaintext_stored_value_is_an_error() {
        assert!(PasswordService::verify("password123", "password123").is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hash = PasswordService::hash_async("secret-pass".to_string()).await.unwrap();

        assert!(PasswordService::verify_async("secret-pass".to_string(), hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }
}
