//! Tests for domain error construction and the wire payload.

use rstest::rstest;
use serde_json::json;

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(ErrorCode::Conflict, "Conflict")]
#[case(ErrorCode::NotFound, "Not found")]
#[case(ErrorCode::InternalError, "Internal server error")]
fn blank_messages_fall_back_to_the_code(#[case] code: ErrorCode, #[case] expected: &str) {
    assert_eq!(Error::new(code, "  ").message(), expected);
}

#[rstest]
fn invalid_field_names_the_field_and_value() {
    let error = Error::invalid_field("Role 7 does not exist", "roleId", "unknown_role", 7);
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({"field": "roleId", "code": "unknown_role", "value": 7}))
    );
}

#[rstest]
fn invalid_field_omits_a_missing_value() {
    let error = Error::invalid_field(
        "name must not be empty",
        "name",
        "empty_field",
        None::<&str>,
    );
    assert_eq!(
        error.details(),
        Some(&json!({"field": "name", "code": "empty_field"}))
    );
}

#[rstest]
fn blank_trace_ids_are_ignored() {
    assert!(Error::conflict("taken").with_trace_id(" ").trace_id().is_none());
}

#[rstest]
fn errors_outside_a_request_have_no_trace_id() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn errors_inside_a_request_capture_its_trace_id() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async {
        Error::conflict("Role with this name already exists")
    })
    .await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let error = Error::not_found("User not found").with_trace_id(TRACE_ID);
    assert_eq!(
        serde_json::to_value(&error).expect("serialise error"),
        json!({"code": "not_found", "message": "User not found", "traceId": TRACE_ID})
    );
}

#[rstest]
fn storage_unavailable_uses_a_fixed_message() {
    let error = Error::storage_unavailable();
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.message(), "Database temporarily unavailable");
}

#[rstest]
fn details_are_serialised_verbatim() {
    let error = Error::invalid_field("Role 7 does not exist", "roleId", "unknown_role", 7);
    assert_eq!(
        serde_json::to_value(&error).expect("serialise error"),
        json!({
            "code": "invalid_request",
            "message": "Role 7 does not exist",
            "details": {"field": "roleId", "code": "unknown_role", "value": 7}
        })
    );
}
