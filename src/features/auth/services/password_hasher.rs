//! Password hashing with Argon2id.
//!
//! Hashing and verification are CPU-bound and run on the
//! blocking thread pool.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use tracing::warn;

use crate::core::config::HasherConfig;
use crate::core::error::{AppError, Result};

/// Salted one-way credential hasher
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    /// Verified against when the account does not exist, so both login
    /// failure paths pay the same cost
    decoy_hash: String,
}

impl CredentialHasher {
    pub fn new(config: &HasherConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;

        let decoy_hash = hash_with(&params, "decoy-password-never-matches")?;

        Ok(Self { params, decoy_hash })
    }

    /// Hash a password into a PHC string carrying its own salt and parameters
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || hash_with(&params, &plaintext))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Check a password against a stored hash.
    ///
    /// Malformed hashes and task failures count as a mismatch.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || verify_with(&plaintext, &hash)).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Burn one verification against the decoy hash and report no match
    pub async fn verify_decoy(&self, plaintext: &str) -> bool {
        let decoy = self.decoy_hash.clone();
        self.verify(plaintext, &decoy).await;
        false
    }
}

fn hash_with(params: &Params, plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_with(plaintext: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    // Parameters come from the parsed hash, not from our config
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_hasher;

    #[tokio::test]
    async fn test_hash_is_argon2id_phc() {
        let hash = test_hasher().hash("secret1").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
    }

    #[tokio::test]
    async fn test_same_password_different_salts() {
        let hasher = test_hasher();
        let first = hasher.hash("same_password").await.unwrap();
        let second = hasher.hash("same_password").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_verify_round_trip() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct horse").await.unwrap();

        assert!(hasher.verify("correct horse", &hash).await);
        assert!(!hasher.verify("wrong horse", &hash).await);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        let hasher = test_hasher();
        assert!(!hasher.verify("anything", "not_a_valid_hash").await);
        assert!(!hasher.verify("anything", "").await);
    }

    #[tokio::test]
    async fn test_unicode_password() {
        let hasher = test_hasher();
        let hash = hasher.hash("contraseña-секрет").await.unwrap();
        assert!(hasher.verify("contraseña-секрет", &hash).await);
    }

    #[tokio::test]
    async fn test_decoy_never_matches() {
        let hasher = test_hasher();
        assert!(!hasher.verify_decoy("decoy-password-never-matches").await);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let config = HasherConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            CredentialHasher::new(&config),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_configured_work_factor_is_encoded() {
        let config = HasherConfig {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        };
        let hasher = CredentialHasher::new(&config).unwrap();
        let hash = hash_with(&hasher.params, "pw").unwrap();
        assert!(hash.contains("m=64,t=2,p=1"));
    }
}
