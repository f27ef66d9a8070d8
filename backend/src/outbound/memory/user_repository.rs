//! Process-local [`UserRepository`] backed by hash maps.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{Series, SeriesId, UserId, Username};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Username, StoredCredentials>,
    ids: HashSet<UserId>,
    /// Follow order per user, oldest first, without repeats.
    follows: HashMap<UserId, Vec<SeriesId>>,
}

/// Credentials and follow relations held behind a single mutex.
///
/// The lock is only held for map access and never across an await point.
///
/// # Examples
/// ```
/// use tvtrackr::outbound::memory::InMemoryUserRepository;
///
/// let repository = InMemoryUserRepository::default();
/// # let _ = repository;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, UserRepositoryError> {
        self.state
            .lock()
            .map_err(|_| UserRepositoryError::query("in-memory user state is poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, record: &StoredCredentials) -> Result<(), UserRepositoryError> {
        let mut state = self.lock()?;
        let username = record.user.username();
        if state.users.contains_key(username) {
            return Err(UserRepositoryError::duplicate_username(username.as_ref()));
        }
        state.ids.insert(record.user.id().clone());
        state.users.insert(username.clone(), record.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(self.lock()?.users.get(username).cloned())
    }

    async fn follow(
        &self,
        user_id: &UserId,
        series_id: &SeriesId,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.lock()?;
        if !state.ids.contains(user_id) {
            return Err(UserRepositoryError::unknown_user(user_id.to_string()));
        }
        let followed = state.follows.entry(user_id.clone()).or_default();
        if !followed.contains(series_id) {
            followed.push(series_id.clone());
        }
        Ok(())
    }

    async fn followed(&self, user_id: &UserId) -> Result<Vec<Series>, UserRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .follows
            .get(user_id)
            .map(|ids| ids.iter().cloned().map(Series::untitled).collect())
            .unwrap_or_default())
    }
}
