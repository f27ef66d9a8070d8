//! Driven port for the external series metadata provider.

use async_trait::async_trait;

use crate::domain::{SearchQuery, SeriesRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by series search adapters.
    pub enum SeriesSearchError {
        /// The provider refused the API key or bearer token.
        Authentication { status: u16, message: String } =>
            "series provider rejected credentials with status {status}: {message}",
        /// The provider answered with a non-success status.
        Status { status: u16, body: String } =>
            "series provider returned status {status}: {body}",
        /// The request did not complete in time.
        Timeout { message: String } => "series provider timed out: {message}",
        /// Connection or protocol failure.
        Transport { message: String } => "series provider request failed: {message}",
        /// The provider's payload did not match the expected envelope.
        Decode { message: String } => "series provider payload invalid: {message}",
    }
}

/// Search the provider's catalogue by free text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesSearch: Send + Sync {
    /// Return raw result records for `query`.
    async fn search_series(&self, query: &SearchQuery)
    -> Result<Vec<SeriesRecord>, SeriesSearchError>;
}
