//! Tests for permission HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use pagination::Paginated;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::{Error, Permission, PermissionListing, PermissionName, RoleSummary};
use crate::inbound::http::test_utils::{MockPorts, call_json};

#[fixture]
fn read_users() -> PermissionListing {
    PermissionListing {
        permission: Permission {
            id: 1,
            name: PermissionName::ReadUsers,
            description: Some("List and view users".into()),
        },
        role_count: 2,
    }
}

#[rstest]
#[actix_web::test]
async fn list_returns_envelope_with_role_counts(read_users: PermissionListing) {
    let mut ports = MockPorts::default();
    ports
        .permissions_query
        .expect_list_permissions()
        .withf(|page| page.page() == 2 && page.limit() == 1)
        .times(1)
        .return_once(move |page| Ok(Paginated::new(vec![read_users], page, 3)));

    let (status, body) = call_json(
        ports,
        TestRequest::get().uri("/api/v1/permissions?page=2&limit=1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [{
                "id": 1,
                "name": "READ_USERS",
                "description": "List and view users",
                "_count": {"roles": 2}
            }],
            "meta": {"total": 3, "page": 2, "limit": 1, "totalPages": 3}
        })
    );
}

#[rstest]
#[actix_web::test]
async fn list_rejects_non_numeric_page() {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::get().uri("/api/v1/permissions?page=first"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "page");
}

#[rstest]
#[actix_web::test]
async fn names_route_wins_over_id_route() {
    let mut ports = MockPorts::default();
    ports
        .permissions_query
        .expect_permission_names()
        .times(1)
        .return_const(PermissionName::ALL.to_vec());

    let (status, body) =
        call_json(ports, TestRequest::get().uri("/api/v1/permissions/names")).await;

    assert_eq!(status, StatusCode::OK);
    let names = body.as_array().expect("array of names");
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "READ_USERS");
    assert_eq!(names[9], "VIEW_RANKINGS");
}

#[rstest]
#[case("0")]
#[case("-1")]
#[case("abc")]
#[actix_web::test]
async fn get_rejects_invalid_ids(#[case] id: &str) {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::get().uri(&format!("/api/v1/permissions/{id}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_id");
}

#[rstest]
#[actix_web::test]
async fn get_maps_missing_permission_to_404() {
    let mut ports = MockPorts::default();
    ports
        .permissions_query
        .expect_get_permission()
        .return_once(|_| Err(Error::not_found("Permission not found")));

    let (status, body) = call_json(ports, TestRequest::get().uri("/api/v1/permissions/9")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Permission not found");
}

#[rstest]
#[actix_web::test]
async fn create_returns_201(read_users: PermissionListing) {
    let mut ports = MockPorts::default();
    ports
        .permissions
        .expect_create_permission()
        .withf(|permission| {
            permission.name == PermissionName::ReadUsers
                && permission.description.as_deref() == Some("List and view users")
        })
        .return_once(move |_| {
            Ok(PermissionListing {
                role_count: 0,
                ..read_users
            })
        });

    let (status, body) = call_json(
        ports,
        TestRequest::post()
            .uri("/api/v1/permissions")
            .set_json(json!({"name": "READ_USERS", "description": "List and view users"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "READ_USERS");
    assert_eq!(body["_count"]["roles"], 0);
}

#[rstest]
#[actix_web::test]
async fn create_rejects_unknown_names() {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::post()
            .uri("/api/v1/permissions")
            .set_json(json!({"name": "LAUNCH_ROCKETS"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!({"field": "name", "code": "invalid_permission_name", "value": "LAUNCH_ROCKETS"})
    );
}

#[rstest]
#[actix_web::test]
async fn create_maps_duplicates_to_409() {
    let mut ports = MockPorts::default();
    ports
        .permissions
        .expect_create_permission()
        .return_once(|_| Err(Error::conflict("Permission with this name already exists")));

    let (status, body) = call_json(
        ports,
        TestRequest::post()
            .uri("/api/v1/permissions")
            .set_json(json!({"name": "AWARD_POINTS"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case(json!({"description": null}), Some(None))]
#[case(json!({"description": "Read-only"}), Some(Some("Read-only".to_owned())))]
#[case(json!({}), None)]
#[actix_web::test]
async fn update_distinguishes_null_from_absent(
    read_users: PermissionListing,
    #[case] payload: serde_json::Value,
    #[case] expected: Option<Option<String>>,
) {
    let mut ports = MockPorts::default();
    ports
        .permissions
        .expect_update_permission()
        .withf(move |id, changes| *id == 1 && changes.description == expected)
        .return_once(move |_, _| Ok(read_users));

    let (status, _) = call_json(
        ports,
        TestRequest::put()
            .uri("/api/v1/permissions/1")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn delete_reports_success() {
    let mut ports = MockPorts::default();
    ports
        .permissions
        .expect_delete_permission()
        .withf(|id| *id == 4)
        .return_once(|_| Ok(()));

    let (status, body) =
        call_json(ports, TestRequest::delete().uri("/api/v1/permissions/4")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Permission deleted successfully"})
    );
}

#[rstest]
#[actix_web::test]
async fn roles_for_permission_lists_summaries() {
    let mut ports = MockPorts::default();
    ports
        .permissions_query
        .expect_roles_for_permission()
        .return_once(|_| {
            Ok(vec![
                RoleSummary {
                    id: 1,
                    name: "admin".into(),
                },
                RoleSummary {
                    id: 3,
                    name: "moderator".into(),
                },
            ])
        });

    let (status, body) =
        call_json(ports, TestRequest::get().uri("/api/v1/permissions/1/roles")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "name": "admin"}, {"id": 3, "name": "moderator"}])
    );
}
