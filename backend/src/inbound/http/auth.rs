//! Bearer-token authentication for HTTP handlers.
//!
//! Login mints an HS256 JWT; protected handlers take an
//! [`AuthenticatedUser`] parameter, which rejects the request with
//! `401 unauthorized` unless the `Authorization: Bearer <token>` header
//! carries a token signed with the configured secret that has not expired.

use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::{Error, User, UserId};
use crate::inbound::http::state::HttpState;

/// Lifetime of a session token.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

const BEARER_PREFIX: &str = "Bearer ";
const REJECTION: &str = "missing or invalid bearer token";

/// Errors raised when a signing secret is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningSecretError {
    /// The secret is shorter than [`MIN_SECRET_BYTES`].
    #[error("signing secret must be at least {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// HMAC key material for session tokens. Wiped on drop.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Accept `raw` if it is long enough to sign tokens.
    pub fn new(raw: impl Into<Vec<u8>>) -> Result<Self, SigningSecretError> {
        let bytes = Zeroizing::new(raw.into());
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(SigningSecretError::TooShort {
                min: MIN_SECRET_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    exp: i64,
    iat: i64,
}

/// Issues and verifies session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a service signing with `secret` and reading time from `clock`.
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is checked against `clock` in `verify`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Mint a token for `user` expiring [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user: &User) -> Result<String, Error> {
        let iat = self.clock.utc().timestamp();
        let claims = Claims {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            exp: iat + TOKEN_TTL_SECS,
            iat,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign session token: {err}")))
    }

    /// Resolve `token` to the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(REJECTION)
        })?;
        if self.clock.utc().timestamp() >= data.claims.exp {
            debug!("bearer token expired");
            return Err(Error::unauthorized(REJECTION));
        }
        UserId::new(&data.claims.sub).map_err(|err| {
            debug!(error = %err, "bearer token subject is not a user id");
            Error::unauthorized(REJECTION)
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

/// Identity of the caller, established from the bearer token.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tvtrackr::inbound::http::auth::AuthenticatedUser;
///
/// async fn handler(user: AuthenticatedUser) -> HttpResponse {
///     HttpResponse::Ok().body(user.id().to_string())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Authenticated user's id.
    pub fn id(&self) -> &UserId {
        &self.0
    }

    /// Take the user id.
    pub fn into_id(self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("HTTP state is not configured")));
        };
        let result = bearer_token(req)
            .ok_or_else(|| Error::unauthorized(REJECTION))
            .and_then(|token| state.tokens.verify(token))
            .map(Self);
        ready(result)
    }
}
