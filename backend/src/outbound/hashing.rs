//! Argon2id implementation of the `PasswordHasher` port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use crate::domain::TraceId;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Number of passes.
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Config {
    /// Cheap parameters for tests. Never use in production.
    pub fn testing() -> Self {
        Self {
            memory_cost: 1_024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Salts and hashes passwords with Argon2id v0x13 on the blocking pool.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Build a hasher from cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hash`] when argon2 rejects the parameters.
    pub fn new(config: Argon2Config) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    async fn run_blocking<T, F>(work: F) -> Result<T, PasswordHashError>
    where
        F: FnOnce() -> Result<T, PasswordHashError> + Send + 'static,
        T: Send + 'static,
    {
        TraceId::spawn_blocking(work)
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();
        Self::run_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        })
        .await
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        Self::run_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
            match Self::argon2(params).verify_password(plaintext.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(HashError::Password) => Ok(false),
                Err(err) => Err(PasswordHashError::hash(err.to_string())),
            }
        })
        .await
    }
}
