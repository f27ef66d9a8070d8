//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("pool exhausted: postgres://secret@db")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::duplicate_username("taken"), StatusCode::BAD_REQUEST)]
#[case(Error::invalid_credentials(), StatusCode::UNAUTHORIZED)]
#[case(Error::unauthorized("no token"), StatusCode::UNAUTHORIZED)]
#[case(Error::upstream("tvdb"), StatusCode::BAD_GATEWAY)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn body_of(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);

    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    assert_eq!(
        body_of(response).await,
        json!({ "code": "internal_error", "message": "Internal server error", "traceId": TRACE_ID })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("seriesId must not be empty")
        .with_details(json!({ "field": "seriesId" }));

    let response = ResponseError::error_response(&error);

    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    assert_eq!(
        body_of(response).await,
        json!({
            "code": "invalid_request",
            "message": "seriesId must not be empty",
            "details": { "field": "seriesId" },
        })
    );
}

#[derive(Debug, Deserialize)]
#[expect(dead_code, reason = "only deserialisation matters")]
struct SampleBody {
    name: String,
}

#[derive(Debug, Deserialize)]
#[expect(dead_code, reason = "only deserialisation matters")]
struct SampleQuery {
    query: String,
}

async fn sample_body(_: web::Json<SampleBody>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn sample_query(_: web::Query<SampleQuery>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[rstest]
#[case::malformed("{not json".to_owned())]
#[case::oversized(format!("{{\"name\":\"{}\"}}", "x".repeat(JSON_BODY_LIMIT)))]
#[actix_web::test]
async fn bad_json_bodies_use_the_error_envelope(#[case] body: String) {
    let app = actix_test::init_service(
        App::new()
            .app_data(json_config())
            .route("/", web::post().to(sample_body)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["code"], "invalid_json");
}

#[rstest]
#[actix_web::test]
async fn missing_query_parameters_use_the_error_envelope() {
    let app = actix_test::init_service(
        App::new()
            .app_data(query_config())
            .route("/", web::get().to(sample_query)),
    )
    .await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["code"], "invalid_query");
}
