//! TheTVDB v4 outbound adapter.
//!
//! Implements the `SeriesSearch` port over HTTPS with a lazily acquired,
//! in-memory bearer token.

mod client;
mod dto;

pub use client::{DEFAULT_BASE_URL, TvdbClient, TvdbClientBuildError};
