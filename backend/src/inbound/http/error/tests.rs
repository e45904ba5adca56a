//! Tests for HTTP error mapping.

use actix_web::body::to_bytes;
use actix_web::{App, HttpResponse, test::{self}, web};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

async fn decode(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error payload is JSON")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Role not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("Role with this name already exists"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("pool exhausted"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);

    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    assert_eq!(
        decode(response).await,
        json!({"code": "internal_error", "message": "Internal server error", "traceId": TRACE_ID})
    );
}

#[rstest]
#[actix_web::test]
async fn unavailable_storage_hides_the_driver_reason() {
    let response = ResponseError::error_response(&Error::storage_unavailable());

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        decode(response).await,
        json!({"code": "service_unavailable", "message": "Database temporarily unavailable"})
    );
}

#[rstest]
#[actix_web::test]
async fn conflict_payload_is_passed_through() {
    let error = Error::conflict("Cannot delete role that has associated users");

    let response = ResponseError::error_response(&error);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    assert_eq!(
        decode(response).await,
        json!({"code": "conflict", "message": "Cannot delete role that has associated users"})
    );
}

#[derive(Debug, Deserialize)]
struct Body {
    #[expect(dead_code, reason = "only the extractor outcome matters")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[expect(dead_code, reason = "only the extractor outcome matters")]
    page: u32,
}

async fn rejection_body(request: test::TestRequest) -> Value {
    let app = test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route(
                "/body",
                web::post().to(|_: web::Json<Body>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/items/{id}",
                web::get().to(|_: web::Path<u32>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/items",
                web::get().to(|_: web::Query<Paging>| async { HttpResponse::Ok().finish() }),
            ),
    )
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    test::read_body_json(response).await
}

#[rstest]
#[case(
    test::TestRequest::post()
        .uri("/body")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json"),
    "invalid_body"
)]
#[case(test::TestRequest::get().uri("/items/abc"), "invalid_path")]
#[case(test::TestRequest::get().uri("/items?page=x"), "invalid_query")]
#[actix_web::test]
async fn extractor_rejections_use_the_error_envelope(
    #[case] request: test::TestRequest,
    #[case] detail_code: &str,
) {
    let body = rejection_body(request).await;

    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], detail_code);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}
