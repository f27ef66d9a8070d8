//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities shared by the HTTP boundary and
//! the storage and metadata adapters. Types validate on construction so the
//! rest of the crate can trust them.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User / UserId / Username: account identity.
//! - Credentials: validated login or registration input.
//! - Series / SeriesId / SearchQuery: followed series and provider search.
//! - PasswordHasher: Argon2id hashing shared by every backend.
//! - AccountService: the `UserService` implementation.

mod account_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod series;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{Credentials, CredentialsValidationError, PASSWORD_MAX_BYTES};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{HashCost, PasswordHashError, PasswordHasher};
pub use self::series::{
    SEARCH_QUERY_MAX, SERIES_ID_MAX, SearchQuery, Series, SeriesId, SeriesRecord,
    SeriesValidationError,
};
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tvtrackr::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("missing bearer token"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
