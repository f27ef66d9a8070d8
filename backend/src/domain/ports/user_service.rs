//! Driving port for account and follow use-cases.
//!
//! HTTP handlers depend on this trait only, so the storage backend is picked
//! once at startup and handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, Series, SeriesId, User, UserId};

/// Account registration, login and series following.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account. Fails with `duplicate_username` when taken.
    async fn register(&self, credentials: &Credentials) -> Result<User, Error>;

    /// Check credentials. Unknown users and wrong passwords both fail with
    /// `invalid_credentials`.
    async fn login(&self, credentials: &Credentials) -> Result<User, Error>;

    /// Follow a series; following twice is not an error.
    async fn follow_series(&self, user_id: &UserId, series_id: &SeriesId) -> Result<(), Error>;

    /// List followed series, empty when none.
    async fn list_followed_series(&self, user_id: &UserId) -> Result<Vec<Series>, Error>;
}
