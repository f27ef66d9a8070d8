//! Application settings loaded via OrthoConfig and their validated form.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use tvtrackr::domain::{HashCost, PasswordHashError, PasswordHasher};
use tvtrackr::inbound::http::auth::{SigningSecret, SigningSecretError};
use tvtrackr::outbound::tvdb::DEFAULT_BASE_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TVDB_TIMEOUT_SECS: u64 = 10;

/// Raw settings read from CLI flags, `TVTRACKR_*` variables and config files.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TVTRACKR")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// `memory` or `postgres`.
    pub storage: Option<String>,
    /// PostgreSQL connection string, required for `postgres` storage.
    pub database_url: Option<String>,
    /// HS256 signing secret, at least 32 bytes.
    pub jwt_secret: Option<String>,
    /// TheTVDB API key.
    pub tvdb_api_key: Option<String>,
    /// TheTVDB v4 base URL.
    pub tvdb_base_url: Option<String>,
    /// Per-request timeout for TheTVDB calls.
    pub tvdb_timeout_secs: Option<u64>,
    /// Argon2 memory cost in KiB.
    pub password_hash_memory_kib: Option<u32>,
    /// Argon2 pass count.
    pub password_hash_iterations: Option<u32>,
    /// Argon2 lanes.
    pub password_hash_parallelism: Option<u32>,
}

fn redacted<T>(value: Option<&T>) -> Option<&'static str> {
    value.map(|_| "<redacted>")
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("storage", &self.storage)
            .field("database_url", &redacted(self.database_url.as_ref()))
            .field("jwt_secret", &redacted(self.jwt_secret.as_ref()))
            .field("tvdb_api_key", &redacted(self.tvdb_api_key.as_ref()))
            .field("tvdb_base_url", &self.tvdb_base_url)
            .field("tvdb_timeout_secs", &self.tvdb_timeout_secs)
            .field("password_hash_memory_kib", &self.password_hash_memory_kib)
            .field("password_hash_iterations", &self.password_hash_iterations)
            .field("password_hash_parallelism", &self.password_hash_parallelism)
            .finish()
    }
}

/// Errors raised while validating [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind_addr {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("unknown storage backend {0:?}; expected `memory` or `postgres`")]
    UnknownStorage(String),
    #[error("database_url is required when storage is postgres")]
    MissingDatabaseUrl,
    #[error("jwt_secret is required")]
    MissingJwtSecret,
    #[error("invalid jwt_secret: {0}")]
    JwtSecret(#[from] SigningSecretError),
    #[error("tvdb_api_key is required")]
    MissingTvdbApiKey,
    #[error("invalid tvdb_base_url {value:?}: {message}")]
    InvalidTvdbBaseUrl { value: String, message: String },
    #[error("tvdb_timeout_secs must be greater than zero")]
    ZeroTvdbTimeout,
    #[error("invalid password hash cost: {0}")]
    HashCost(#[from] PasswordHashError),
}

/// Where accounts and follows are kept.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres { database_url: String },
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Postgres { .. } => f.write_str("Postgres"),
        }
    }
}

/// Connection settings for TheTVDB.
#[derive(Clone)]
pub struct TvdbSettings {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

/// Validated server configuration.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: StorageBackend,
    pub(crate) signing_secret: SigningSecret,
    pub(crate) tvdb: TvdbSettings,
    pub(crate) hasher: PasswordHasher,
}

impl ServerConfig {
    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn parse_bind_addr(raw: Option<String>) -> Result<SocketAddr, ConfigError> {
    let value = raw.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    value
        .parse()
        .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
            message: err.to_string(),
            value,
        })
}

fn parse_storage(
    raw: Option<String>,
    database_url: Option<String>,
) -> Result<StorageBackend, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("memory") => Ok(StorageBackend::Memory),
        Some("postgres") => database_url
            .filter(|url| !url.trim().is_empty())
            .map(|database_url| StorageBackend::Postgres { database_url })
            .ok_or(ConfigError::MissingDatabaseUrl),
        Some(other) => Err(ConfigError::UnknownStorage(other.to_owned())),
    }
}

fn parse_tvdb(
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<TvdbSettings, ConfigError> {
    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingTvdbApiKey)?;
    let raw_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
    let base_url = Url::parse(&raw_url).map_err(|err| ConfigError::InvalidTvdbBaseUrl {
        message: err.to_string(),
        value: raw_url.clone(),
    })?;
    let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TVDB_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::ZeroTvdbTimeout);
    }
    Ok(TvdbSettings {
        base_url,
        api_key,
        timeout: Duration::from_secs(timeout_secs),
    })
}

impl TryFrom<AppSettings> for ServerConfig {
    type Error = ConfigError;

    fn try_from(settings: AppSettings) -> Result<Self, Self::Error> {
        let AppSettings {
            bind_addr,
            storage,
            database_url,
            jwt_secret,
            tvdb_api_key,
            tvdb_base_url,
            tvdb_timeout_secs,
            password_hash_memory_kib,
            password_hash_iterations,
            password_hash_parallelism,
        } = settings;

        let signing_secret =
            SigningSecret::new(jwt_secret.ok_or(ConfigError::MissingJwtSecret)?)?;
        let defaults = HashCost::default();
        let hasher = PasswordHasher::new(HashCost {
            memory_kib: password_hash_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: password_hash_iterations.unwrap_or(defaults.iterations),
            parallelism: password_hash_parallelism.unwrap_or(defaults.parallelism),
        })?;

        Ok(Self {
            bind_addr: parse_bind_addr(bind_addr)?,
            storage: parse_storage(storage, database_url)?,
            signing_secret,
            tvdb: parse_tvdb(tvdb_api_key, tvdb_base_url, tvdb_timeout_secs)?,
            hasher,
        })
    }
}
