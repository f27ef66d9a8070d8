//! Reqwest-backed TheTVDB client.
//!
//! The client logs in on first use and caches the bearer token. A 401 from
//! the search endpoint drops the cached token so the next call logs in
//! again; the failing call itself is not retried.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{LoginRequestDto, LoginResponseDto, SearchResponseDto};
use crate::domain::ports::{SeriesSearch, SeriesSearchError};
use crate::domain::{SearchQuery, SeriesRecord};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api4.thetvdb.com/v4";

/// Errors raised while constructing a [`TvdbClient`].
#[derive(Debug, thiserror::Error)]
pub enum TvdbClientBuildError {
    /// The base URL cannot carry path segments.
    #[error("invalid TheTVDB base URL: {url}")]
    InvalidBaseUrl { url: String },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// TheTVDB adapter implementing [`SeriesSearch`].
pub struct TvdbClient {
    client: Client,
    login_url: Url,
    search_url: Url,
    api_key: Zeroizing<String>,
    token: RwLock<Option<String>>,
}

impl fmt::Debug for TvdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TvdbClient")
            .field("login_url", &self.login_url.as_str())
            .field("search_url", &self.search_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TvdbClient {
    /// Build a client rooted at `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TvdbClientBuildError`] when the base URL cannot be extended
    /// or the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TvdbClientBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            login_url: endpoint(&base_url, "login")?,
            search_url: endpoint(&base_url, "search")?,
            api_key: Zeroizing::new(api_key.into()),
            token: RwLock::new(None),
        })
    }

    async fn token(&self) -> Result<String, SeriesSearchError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        let token = self.login().await?;
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn login(&self) -> Result<String, SeriesSearchError> {
        debug!("authenticating with TheTVDB");
        let response = self
            .client
            .post(self.login_url.clone())
            .json(&LoginRequestDto {
                apikey: self.api_key.as_str(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "TheTVDB login rejected");
            return Err(SeriesSearchError::authentication(
                status.as_u16(),
                body_preview(body.as_ref()),
            ));
        }
        parse_token(body.as_ref())
    }

    async fn clear_token(&self) {
        self.token.write().await.take();
    }
}

#[async_trait]
impl SeriesSearch for TvdbClient {
    async fn search_series(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SeriesRecord>, SeriesSearchError> {
        let token = self.token().await?;
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("query", query.as_ref()), ("type", "series")])
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::UNAUTHORIZED {
            warn!("TheTVDB token rejected; it will be refreshed on the next search");
            self.clear_token().await;
            return Err(SeriesSearchError::authentication(
                status.as_u16(),
                body_preview(body.as_ref()),
            ));
        }
        if !status.is_success() {
            return Err(SeriesSearchError::status(
                status.as_u16(),
                body_preview(body.as_ref()),
            ));
        }
        parse_records(body.as_ref())
    }
}

fn endpoint(base: &Url, segment: &str) -> Result<Url, TvdbClientBuildError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| TvdbClientBuildError::InvalidBaseUrl {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

fn parse_token(body: &[u8]) -> Result<String, SeriesSearchError> {
    let decoded: LoginResponseDto = serde_json::from_slice(body).map_err(|error| {
        SeriesSearchError::decode(format!("invalid login payload: {error}"))
    })?;
    if decoded.data.token.trim().is_empty() {
        return Err(SeriesSearchError::decode("login payload carried an empty token"));
    }
    Ok(decoded.data.token)
}

fn parse_records(body: &[u8]) -> Result<Vec<SeriesRecord>, SeriesSearchError> {
    let decoded: SearchResponseDto = serde_json::from_slice(body).map_err(|error| {
        SeriesSearchError::decode(format!("invalid search payload: {error}"))
    })?;
    Ok(decoded.into_records())
}

fn map_transport_error(error: reqwest::Error) -> SeriesSearchError {
    if error.is_timeout() {
        SeriesSearchError::timeout(error.to_string())
    } else {
        SeriesSearchError::transport(error.to_string())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
