//! Salted, memory-hard password hashing.
//!
//! Hashes are Argon2id PHC strings, so the cost parameters travel with each
//! hash and verification keeps working after the configured cost changes.
//! Hashing runs on the blocking pool; callers must not hold locks across it.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Cost parameters were rejected by Argon2.
    #[error("invalid password hash cost: {message}")]
    InvalidCost { message: String },
    /// Hash computation or parsing failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// The blocking task did not complete.
    #[error("password hashing task failed: {message}")]
    Task { message: String },
}

impl PasswordHashError {
    fn hash(error: impl std::fmt::Display) -> Self {
        Self::Hash {
            message: error.to_string(),
        }
    }
}

/// Tunable Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. Test use only.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// Argon2id hasher shared by every credential store.
///
/// # Examples
/// ```
/// use tvtrackr::domain::{HashCost, PasswordHasher};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let hasher = PasswordHasher::new(HashCost::minimal()).expect("valid cost");
/// let hash = hasher.hash("pw1").await.expect("hash");
/// assert!(hasher.verify("pw1", Some(&hash)).await.expect("verify"));
/// # });
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    argon: Arc<Argon2<'static>>,
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Build a hasher with the given cost.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::InvalidCost`] when Argon2 rejects the
    /// parameters.
    pub fn new(cost: HashCost) -> Result<Self, PasswordHashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|err| PasswordHashError::InvalidCost {
                message: err.to_string(),
            })?;
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        // Unknown usernames are verified against this so both login failures
        // cost the same.
        let dummy_hash = hash_blocking(&argon, "tvtrackr-unknown-user")?;
        Ok(Self {
            argon: Arc::new(argon),
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash `password` with a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let argon = Arc::clone(&self.argon);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&argon, password.as_str()))
            .await
            .map_err(|err| PasswordHashError::Task {
                message: err.to_string(),
            })?
    }

    /// Check `password` against `stored`.
    ///
    /// When `stored` is `None` the dummy hash is checked instead and the
    /// result is always `false`.
    pub async fn verify(
        &self,
        password: &str,
        stored: Option<&str>,
    ) -> Result<bool, PasswordHashError> {
        let argon = Arc::clone(&self.argon);
        let password = Zeroizing::new(password.to_owned());
        let known = stored.is_some();
        let hash = stored.map_or_else(|| self.dummy_hash.to_string(), str::to_owned);
        let matched = tokio::task::spawn_blocking(move || {
            verify_blocking(&argon, password.as_str(), &hash)
        })
        .await
        .map_err(|err| PasswordHashError::Task {
            message: err.to_string(),
        })??;
        Ok(known && matched)
    }
}

fn hash_blocking(argon: &Argon2<'_>, password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    argon
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordHashError::hash)
}

fn verify_blocking(argon: &Argon2<'_>, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(hash).map_err(PasswordHashError::hash)?;
    match argon.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::hash(err)),
    }
}
