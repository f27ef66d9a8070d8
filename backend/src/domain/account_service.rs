//! Account domain service.
//!
//! Implements the [`UserService`] driving port over any [`UserRepository`].
//! Password hashing and the credential comparison happen here so every
//! storage backend shares the same rules.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError, UserService};
use crate::domain::{
    Credentials, Error, PasswordHashError, PasswordHasher, Series, SeriesId, User, UserId,
};

/// Account service implementing the [`UserService`] driving port.
#[derive(Clone)]
pub struct AccountService<R> {
    repository: Arc<R>,
    hasher: PasswordHasher,
}

impl<R> AccountService<R> {
    /// Create a new service over `repository`.
    pub fn new(repository: Arc<R>, hasher: PasswordHasher) -> Self {
        Self { repository, hasher }
    }
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                error!(%message, "user repository unavailable");
                Error::internal(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                error!(%message, "user repository query failed");
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateUsername { .. } => {
                Error::duplicate_username("username already exists")
            }
            UserRepositoryError::UnknownUser { user_id } => {
                warn!(%user_id, "token subject has no account");
                Error::unauthorized("account no longer exists")
            }
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        error!(error = %error, "password hashing failed");
        Error::internal(error.to_string())
    }
}

#[async_trait]
impl<R> UserService for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, credentials: &Credentials) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(Self::map_hash_error)?;
        let user = User::new(UserId::random(), credentials.username().clone());
        let record = StoredCredentials {
            user: user.clone(),
            password_hash,
        };
        self.repository
            .create(&record)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, Error> {
        let stored = self
            .repository
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_repository_error)?;
        let matched = self
            .hasher
            .verify(
                credentials.password(),
                stored.as_ref().map(|record| record.password_hash.as_str()),
            )
            .await
            .map_err(Self::map_hash_error)?;

        match stored {
            Some(record) if matched => Ok(record.user),
            _ => {
                debug!("login rejected");
                Err(Error::invalid_credentials())
            }
        }
    }

    async fn follow_series(&self, user_id: &UserId, series_id: &SeriesId) -> Result<(), Error> {
        self.repository
            .follow(user_id, series_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn list_followed_series(&self, user_id: &UserId) -> Result<Vec<Series>, Error> {
        self.repository
            .followed(user_id)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, HashCost, Username};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost::minimal()).expect("minimal cost is valid")
    }

    fn make_service(
        repo: MockUserRepository,
        hasher: PasswordHasher,
    ) -> AccountService<MockUserRepository> {
        AccountService::new(Arc::new(repo), hasher)
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials::try_from_parts(username, password).expect("valid credentials")
    }

    async fn stored_alice(hasher: &PasswordHasher) -> StoredCredentials {
        StoredCredentials {
            user: User::new(UserId::random(), Username::new("alice").expect("username")),
            password_hash: hasher.hash("pw1").await.expect("hash"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_persists_a_hashed_password(hasher: PasswordHasher) {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|record| {
                record.user.username().as_ref() == "alice"
                    && record.password_hash.starts_with("$argon2id$")
                    && !record.password_hash.contains("pw1")
            })
            .times(1)
            .return_once(|_| Ok(()));

        let user = make_service(repo, hasher)
            .register(&credentials("alice", "pw1"))
            .await
            .expect("register succeeds");

        assert_eq!(user.username().as_ref(), "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_duplicates(hasher: PasswordHasher) {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .times(1)
            .return_once(|_| Err(UserRepositoryError::duplicate_username("alice")));

        let error = make_service(repo, hasher)
            .register(&credentials("alice", "pw1"))
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::DuplicateUsername);
        assert_eq!(error.message(), "username already exists");
    }

    #[rstest]
    #[tokio::test]
    async fn login_returns_the_stored_user(hasher: PasswordHasher) {
        let stored = stored_alice(&hasher).await;
        let expected = stored.user.clone();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let user = make_service(repo, hasher)
            .login(&credentials("alice", "pw1"))
            .await
            .expect("login succeeds");

        assert_eq!(user, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_and_wrong_password_fail_identically(hasher: PasswordHasher) {
        let stored = stored_alice(&hasher).await;
        let mut known = MockUserRepository::new();
        known
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(stored)));
        let mut unknown = MockUserRepository::new();
        unknown.expect_find_by_username().return_once(|_| Ok(None));

        let wrong_password = make_service(known, hasher.clone())
            .login(&credentials("alice", "nope"))
            .await
            .expect_err("wrong password");
        let unknown_user = make_service(unknown, hasher)
            .login(&credentials("bob", "pw1"))
            .await
            .expect_err("unknown user");

        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.code(), ErrorCode::InvalidCredentials);
    }

    #[rstest]
    #[case(UserRepositoryError::connection("refused"))]
    #[case(UserRepositoryError::query("syntax"))]
    #[tokio::test]
    async fn repository_failures_are_internal(
        hasher: PasswordHasher,
        #[case] failure: UserRepositoryError,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_followed().return_once(move |_| Err(failure));

        let error = make_service(repo, hasher)
            .list_followed_series(&UserId::random())
            .await
            .expect_err("store failure");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn follow_delegates_to_the_repository(hasher: PasswordHasher) {
        let user_id = UserId::random();
        let series_id = SeriesId::new("123").expect("series id");
        let mut repo = MockUserRepository::new();
        repo.expect_follow()
            .with(eq(user_id.clone()), eq(series_id.clone()))
            .times(1)
            .return_once(|_, _| Ok(()));

        make_service(repo, hasher)
            .follow_series(&user_id, &series_id)
            .await
            .expect("follow succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn follow_for_a_vanished_account_is_unauthorised(hasher: PasswordHasher) {
        let user_id = UserId::random();
        let missing = user_id.to_string();
        let mut repo = MockUserRepository::new();
        repo.expect_follow()
            .return_once(move |_, _| Err(UserRepositoryError::unknown_user(missing)));

        let error = make_service(repo, hasher)
            .follow_series(&user_id, &SeriesId::new("123").expect("series id"))
            .await
            .expect_err("unknown account");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn login_surfaces_corrupt_hashes_as_internal(hasher: PasswordHasher) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().return_once(|_| {
            Ok(Some(StoredCredentials {
                user: User::new(UserId::random(), Username::new("alice").expect("username")),
                password_hash: "garbage".to_owned(),
            }))
        });

        let error = make_service(repo, hasher)
            .login(&credentials("alice", "pw1"))
            .await
            .expect_err("corrupt hash");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
