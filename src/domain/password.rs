//! Password value object and the keyed Argon2id credential manager.
//!
//! Every hash in the system goes through [`CredentialManager`], so account
//! creation, password changes and login share one configuration.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordSettings;
use crate::errors::{AppError, AppResult};

/// Stored password hash (PHC string format).
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Wrap an existing hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// Hashes and verifies passwords with Argon2id, version 0x13, keyed with the
/// application secret.
///
/// Hashing is CPU bound; the async methods run it on the blocking pool.
#[derive(Clone, Debug)]
pub struct CredentialManager {
    settings: Arc<PasswordSettings>,
}

impl CredentialManager {
    /// Build a manager, rejecting parameters Argon2 would refuse.
    pub fn new(settings: PasswordSettings) -> AppResult<Self> {
        let manager = Self {
            settings: Arc::new(settings),
        };
        manager
            .argon2()
            .map_err(|e| AppError::internal(format!("Invalid password hash settings: {}", e)))?;
        Ok(manager)
    }

    /// Hash a plain text password.
    pub async fn hash(&self, plain_text: &str) -> AppResult<Password> {
        let manager = self.clone();
        let plain_text = plain_text.to_owned();

        tokio::task::spawn_blocking(move || manager.hash_blocking(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password hash task failed: {}", e)))?
    }

    /// Verify a plain text password against a stored hash.
    ///
    /// Fails closed: a malformed hash or key yields `false`.
    pub async fn verify(&self, password: &Password, plain_text: &str) -> bool {
        let manager = self.clone();
        let password = password.clone();
        let plain_text = plain_text.to_owned();

        tokio::task::spawn_blocking(move || manager.verify_blocking(&password, &plain_text))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Password verify task failed: {}", e);
                false
            })
    }

    /// Synchronous hashing for callers already off the async runtime.
    pub fn hash_blocking(&self, plain_text: &str) -> AppResult<Password> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self
            .argon2()
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        let hash = argon2
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Password::from_hash(hash.to_string()))
    }

    /// Synchronous verification.
    pub fn verify_blocking(&self, password: &Password, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(password.as_str()) else {
            tracing::warn!("Stored password hash is malformed");
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };
        argon2
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }

    fn argon2(&self) -> Result<Argon2<'_>, argon2::Error> {
        let params = Params::new(
            self.settings.memory_cost,
            self.settings.time_cost,
            self.settings.parallelism,
            None,
        )?;
        Argon2::new_with_secret(
            self.settings.secret_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(secret: &str) -> CredentialManager {
        CredentialManager::new(PasswordSettings::new(secret, 2, 2, 1024)).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let manager = manager("unit-test-secret");
        let password = manager.hash_blocking("p1").unwrap();

        assert_ne!(password.as_str(), "p1");
        assert!(manager.verify_blocking(&password, "p1"));
        assert!(!manager.verify_blocking(&password, "p2"));
    }

    #[test]
    fn test_hash_uses_configured_parameters() {
        let password = manager("unit-test-secret").hash_blocking("p1").unwrap();

        assert!(password.as_str().starts_with("$argon2id$v=19$"));
        assert!(password.as_str().contains("t=2"));
        assert!(password.as_str().contains("p=2"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let manager = manager("unit-test-secret");
        let first = manager.hash_blocking("SamePassword").unwrap();
        let second = manager.hash_blocking("SamePassword").unwrap();

        assert_ne!(first, second);
        assert!(manager.verify_blocking(&first, "SamePassword"));
        assert!(manager.verify_blocking(&second, "SamePassword"));
    }

    #[test]
    fn test_verify_requires_same_secret() {
        let password = manager("secret-one").hash_blocking("p1").unwrap();

        assert!(!manager("secret-two").verify_blocking(&password, "p1"));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let manager = manager("unit-test-secret");
        let garbage = Password::from_hash("not-a-phc-string".to_string());

        assert!(!manager.verify_blocking(&garbage, "anything"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = CredentialManager::new(PasswordSettings::new("secret", 0, 1, 1024));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::from_hash("$argon2id$secret".to_string());
        assert!(!format!("{:?}", password).contains("argon2id"));
    }

    #[tokio::test]
    async fn test_async_hash_round_trip() {
        let manager = manager("unit-test-secret");
        let password = manager.hash("async-pass").await.unwrap();

        assert!(manager.verify(&password, "async-pass").await);
        assert!(!manager.verify(&password, "other").await);
    }
}
