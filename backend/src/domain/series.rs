//! Series references and search inputs.
//!
//! Series are owned by the external metadata provider. This service only
//! stores their identifiers, so [`Series::title`] is empty unless a backend
//! learns the title from somewhere.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Maximum series identifier length in characters.
pub const SERIES_ID_MAX: usize = 64;
/// Maximum search query length in characters.
pub const SEARCH_QUERY_MAX: usize = 256;

/// One loosely typed search result; the schema belongs to the provider.
pub type SeriesRecord = Map<String, Value>;

/// Validation errors for series identifiers and search queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesValidationError {
    #[error("series id must not be empty")]
    EmptyId,
    #[error("series id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("query must be at most {max} characters")]
    QueryTooLong { max: usize },
}

/// Provider-assigned series identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesId(String);

impl SeriesId {
    /// Trim and validate a raw identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SeriesValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SeriesValidationError::EmptyId);
        }
        if trimmed.chars().count() > SERIES_ID_MAX {
            return Err(SeriesValidationError::IdTooLong { max: SERIES_ID_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SeriesId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SeriesId> for String {
    fn from(value: SeriesId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SeriesId {
    type Error = SeriesValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A followed series as returned by `GET /api/v1/series/followed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Series {
    #[schema(value_type = String, example = "81189")]
    id: SeriesId,
    #[schema(example = "")]
    title: String,
}

impl Series {
    /// A series whose title is not known locally.
    pub fn untitled(id: SeriesId) -> Self {
        Self {
            id,
            title: String::new(),
        }
    }

    /// Provider identifier.
    pub fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Title, empty when unknown.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }
}

/// Free-text search string forwarded to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim and validate a raw query.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SeriesValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SeriesValidationError::EmptyQuery);
        }
        if trimmed.chars().count() > SEARCH_QUERY_MAX {
            return Err(SeriesValidationError::QueryTooLong {
                max: SEARCH_QUERY_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
