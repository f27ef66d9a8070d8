//! Authentication primitives such as account credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::user::{USERNAME_MAX, UserValidationError, Username};

/// Maximum accepted password length in bytes. Bounds hashing work per request.
pub const PASSWORD_MAX_BYTES: usize = 128;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded the maximum length.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password exceeded the maximum length.
    #[error("password must be at most {max} bytes")]
    PasswordTooLong { max: usize },
}

impl CredentialsValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong { .. } => "username",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }

    /// Stable detail code for clients.
    pub fn detail_code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooLong { .. } => "username_too_long",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooLong { .. } => "password_too_long",
        }
    }
}

/// Validated credentials used by registration and login.
///
/// ## Invariants
/// - `username` is trimmed, non-empty and at most 64 characters.
/// - `password` is non-empty and at most [`PASSWORD_MAX_BYTES`] bytes; it
///   keeps caller-provided whitespace and is zeroed on drop.
///
/// # Examples
/// ```
/// use tvtrackr::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", "pw1").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username).map_err(|err| match err {
            UserValidationError::UsernameTooLong { max } => {
                CredentialsValidationError::UsernameTooLong { max }
            }
            _ => CredentialsValidationError::EmptyUsername,
        })?;

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password exactly as the caller provided it.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
