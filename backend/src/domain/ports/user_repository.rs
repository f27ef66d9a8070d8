//! Driven port for credential and follow-relation storage.
//!
//! Two adapters implement it: an in-memory map for development and tests,
//! and a Diesel/PostgreSQL repository. Both must report a taken username as
//! [`UserRepositoryError::DuplicateUsername`], treat repeated follows as a
//! no-op, and reject follows for ids with no account as
//! [`UserRepositoryError::UnknownUser`].

use async_trait::async_trait;

use crate::domain::{Series, SeriesId, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username {username} already exists",
        /// No account exists for the user id.
        UnknownUser { user_id: String } => "user {user_id} does not exist",
    }
}

/// Store-internal account record. Never leaves the persistence boundary
/// except to be checked by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Public identity.
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Persistence operations backing the account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with `DuplicateUsername` if taken.
    async fn create(&self, record: &StoredCredentials) -> Result<(), UserRepositoryError>;

    /// Fetch an account by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Record that `user_id` follows `series_id`. Repeats are no-ops; an id
    /// with no account fails with `UnknownUser`.
    async fn follow(&self, user_id: &UserId, series_id: &SeriesId)
    -> Result<(), UserRepositoryError>;

    /// List series followed by `user_id` in the order they were followed;
    /// empty when none.
    async fn followed(&self, user_id: &UserId) -> Result<Vec<Series>, UserRepositoryError>;
}
