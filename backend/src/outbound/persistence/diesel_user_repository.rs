//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Duplicate usernames surface through the unique index on
//! `users.username`; repeated follows are absorbed by the composite primary
//! key on `user_series` with `ON CONFLICT DO NOTHING`. A follow for an id
//! with no `users` row trips the foreign key and is reported as
//! `UnknownUser`. Follows list oldest first.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{Series, SeriesId, User, UserId, Username};

use super::models::{NewFollowRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_series, users};

/// Diesel-backed implementation of the `UserRepository` port.
///
/// Each operation checks out one pooled connection and issues a single
/// statement.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        _ => UserRepositoryError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but reports unique violations on insert as a
/// taken username.
fn map_insert_error(error: diesel::result::Error, username: &Username) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::duplicate_username(username.as_ref())
        }
        other => map_diesel_error(other),
    }
}

/// Like [`map_diesel_error`], but reports a missing `users` row as an
/// unknown user.
fn map_follow_error(error: diesel::result::Error, user_id: &UserId) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            UserRepositoryError::unknown_user(user_id.to_string())
        }
        other => map_diesel_error(other),
    }
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserRepositoryError> {
    let username = Username::new(&row.username).map_err(|err| {
        UserRepositoryError::query(format!("invalid username in database: {err}"))
    })?;
    Ok(StoredCredentials {
        user: User::new(UserId::from_uuid(row.id), username),
        password_hash: row.password_hash,
    })
}

fn row_to_series(raw: String) -> Result<Series, UserRepositoryError> {
    SeriesId::new(&raw)
        .map(Series::untitled)
        .map_err(|err| UserRepositoryError::query(format!("invalid series id in database: {err}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: &StoredCredentials) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let username = record.user.username();
        let row = NewUserRow {
            id: *record.user.id().as_uuid(),
            username: username.as_ref(),
            password_hash: record.password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, username))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn follow(
        &self,
        user_id: &UserId,
        series_id: &SeriesId,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFollowRow {
            user_id: *user_id.as_uuid(),
            series_id: series_id.as_ref(),
        };

        diesel::insert_into(user_series::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_follow_error(err, user_id))
    }

    async fn followed(&self, user_id: &UserId) -> Result<Vec<Series>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<String> = user_series::table
            .filter(user_series::user_id.eq(user_id.as_uuid()))
            .order((user_series::created_at.asc(), user_series::series_id.asc()))
            .select(user_series::series_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        ids.into_iter().map(row_to_series).collect()
    }
}
