//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports ([`UserService`]) are called by inbound adapters; driven
//! ports ([`UserRepository`], [`SeriesSearch`]) are implemented by outbound
//! adapters. Driven ports expose typed errors so adapters map their failures
//! into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod series_search;
mod user_repository;
mod user_service;

#[cfg(test)]
pub use series_search::MockSeriesSearch;
pub use series_search::{SeriesSearch, SeriesSearchError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use user_service::MockUserService;
pub use user_service::UserService;
