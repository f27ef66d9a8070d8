//! Series API handlers.
//!
//! ```text
//! GET  /api/v1/series/search?query=lost
//! POST /api/v1/series/follow {"seriesId":"81189"}   (bearer)
//! GET  /api/v1/series/followed                     (bearer)
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::domain::ports::SeriesSearchError;
use crate::domain::{Error, SearchQuery, Series, SeriesId, SeriesRecord, SeriesValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/v1/series/search`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text series name.
    pub query: String,
}

/// Request body for `POST /api/v1/series/follow`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    #[schema(example = "81189")]
    pub series_id: String,
}

/// Acknowledgement returned by `POST /api/v1/series/follow`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FollowResponse {
    #[schema(example = "series followed")]
    pub message: String,
}

fn map_series_validation_error(field: &'static str, err: SeriesValidationError) -> Error {
    let code = match err {
        SeriesValidationError::EmptyId | SeriesValidationError::EmptyQuery => "empty",
        SeriesValidationError::IdTooLong { .. } | SeriesValidationError::QueryTooLong { .. } => {
            "too_long"
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn map_search_error(err: SeriesSearchError) -> Error {
    warn!(error = %err, "series search failed");
    match err {
        SeriesSearchError::Authentication { status, message } => {
            Error::upstream("series provider rejected our credentials")
                .with_details(json!({ "status": status, "body": message }))
        }
        SeriesSearchError::Status { status, body } => {
            Error::upstream(format!("series provider returned status {status}"))
                .with_details(json!({ "status": status, "body": body }))
        }
        SeriesSearchError::Timeout { .. } => Error::upstream("series provider timed out"),
        SeriesSearchError::Transport { .. } => Error::upstream("series provider is unreachable"),
        SeriesSearchError::Decode { .. } => {
            Error::upstream("series provider returned an unexpected payload")
        }
    }
}

/// Search the metadata provider by series name.
///
/// Records are passed through as the provider returns them.
#[utoipa::path(
    get,
    path = "/api/v1/series/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Provider search results", body = [Object]),
        (status = 400, description = "Missing or invalid query", body = Error),
        (status = 502, description = "Provider failure", body = Error)
    ),
    tags = ["series"],
    operation_id = "searchSeries",
    security([])
)]
#[get("/series/search")]
pub async fn search_series(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<SeriesRecord>>> {
    let query = SearchQuery::new(&params.query)
        .map_err(|err| map_series_validation_error("query", err))?;
    let records = state
        .search
        .search_series(&query)
        .await
        .map_err(map_search_error)?;
    Ok(web::Json(records))
}

/// Follow a series. Following the same series again is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/series/follow",
    request_body = FollowRequest,
    responses(
        (status = 200, description = "Series followed", body = FollowResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["series"],
    operation_id = "followSeries",
    security(("bearer" = []))
)]
#[post("/series/follow")]
pub async fn follow_series(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<FollowRequest>,
) -> ApiResult<web::Json<FollowResponse>> {
    let series_id = SeriesId::new(&payload.series_id)
        .map_err(|err| map_series_validation_error("seriesId", err))?;
    state.users.follow_series(user.id(), &series_id).await?;
    Ok(web::Json(FollowResponse {
        message: "series followed".to_owned(),
    }))
}

/// List the caller's followed series.
#[utoipa::path(
    get,
    path = "/api/v1/series/followed",
    responses(
        (status = 200, description = "Followed series", body = [Series]),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["series"],
    operation_id = "listFollowedSeries",
    security(("bearer" = []))
)]
#[get("/series/followed")]
pub async fn followed_series(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Series>>> {
    let series = state.users.list_followed_series(user.id()).await?;
    Ok(web::Json(series))
}
