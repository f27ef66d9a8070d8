//! Wire shapes for the TheTVDB login and search endpoints.
//!
//! Search records stay loosely typed; only the envelopes are fixed.

use serde::{Deserialize, Serialize};

use crate::domain::SeriesRecord;

#[derive(Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) apikey: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    pub(super) data: LoginDataDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginDataDto {
    pub(super) token: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) data: Option<Vec<SeriesRecord>>,
}

impl SearchResponseDto {
    /// Providers answer `"data": null` for no hits; treat it as empty.
    pub(super) fn into_records(self) -> Vec<SeriesRecord> {
        self.data.unwrap_or_default()
    }
}
