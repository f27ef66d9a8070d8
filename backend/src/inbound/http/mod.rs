//! HTTP inbound adapter exposing REST endpoints under `/api/v1`.

pub mod auth;
pub mod error;
pub mod series;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::{ApiResult, json_config, query_config};

/// Register the `/api/v1` routes and extractor configuration.
///
/// Callers still provide `web::Data<HttpState>`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use tvtrackr::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(users::register)
        .service(users::login)
        .service(series::search_series)
        .service(series::follow_series)
        .service(series::followed_series);
}
