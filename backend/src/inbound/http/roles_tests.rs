//! Tests for role HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use pagination::Paginated;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::{
    Error, Permission, PermissionName, RoleDetail, RoleListing, RoleMember, RoleSummary,
};
use crate::inbound::http::test_utils::{MockPorts, call_json};

#[fixture]
fn moderator() -> RoleDetail {
    RoleDetail {
        id: 2,
        name: "moderator".into(),
        permissions: vec![
            Permission {
                id: 1,
                name: PermissionName::ReadUsers,
                description: None,
            },
            Permission {
                id: 9,
                name: PermissionName::AwardPoints,
                description: Some("Adjust balances".into()),
            },
        ],
        permission_count: 2,
        user_count: 3,
    }
}

#[rstest]
#[actix_web::test]
async fn list_reports_permission_and_user_counts() {
    let mut ports = MockPorts::default();
    ports
        .roles_query
        .expect_list_roles()
        .withf(|page| page.page() == 1 && page.limit() == 10)
        .return_once(|page| {
            Ok(Paginated::new(
                vec![RoleListing {
                    role: RoleSummary {
                        id: 1,
                        name: "admin".into(),
                    },
                    permission_count: 10,
                    user_count: 2,
                }],
                page,
                1,
            ))
        });

    let (status, body) = call_json(ports, TestRequest::get().uri("/api/v1/roles")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [{"id": 1, "name": "admin", "_count": {"permissions": 10, "users": 2}}],
            "meta": {"total": 1, "page": 1, "limit": 10, "totalPages": 1}
        })
    );
}

#[rstest]
#[actix_web::test]
async fn get_flattens_permissions(moderator: RoleDetail) {
    let mut ports = MockPorts::default();
    ports
        .roles_query
        .expect_get_role()
        .withf(|id| *id == 2)
        .return_once(move |_| Ok(moderator));

    let (status, body) = call_json(ports, TestRequest::get().uri("/api/v1/roles/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 2,
            "name": "moderator",
            "permissions": [
                {"id": 1, "name": "READ_USERS", "description": null},
                {"id": 9, "name": "AWARD_POINTS", "description": "Adjust balances"}
            ],
            "_count": {"permissions": 2, "users": 3}
        })
    );
}

#[rstest]
#[actix_web::test]
async fn create_without_permission_ids_grants_nothing(moderator: RoleDetail) {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_create_role()
        .withf(|role| role.name.as_str() == "moderator" && role.permission_ids.is_empty())
        .return_once(move |_| {
            Ok(RoleDetail {
                permissions: Vec::new(),
                permission_count: 0,
                user_count: 0,
                ..moderator
            })
        });

    let (status, body) = call_json(
        ports,
        TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({"name": "moderator"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["permissions"], json!([]));
    assert_eq!(body["_count"], json!({"permissions": 0, "users": 0}));
}

#[rstest]
#[actix_web::test]
async fn create_passes_permission_ids(moderator: RoleDetail) {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_create_role()
        .withf(|role| role.permission_ids == vec![1, 9])
        .return_once(move |_| Ok(moderator));

    let (status, _) = call_json(
        ports,
        TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({"name": "moderator", "permissionIds": [1, 9]})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[case(json!({"name": ""}))]
#[case(json!({"name": "   "}))]
#[actix_web::test]
async fn create_rejects_blank_names(#[case] payload: serde_json::Value) {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::post().uri("/api/v1/roles").set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], json!({"field": "name", "code": "empty_field"}));
}

#[rstest]
#[actix_web::test]
async fn create_rejects_missing_name_as_invalid_body() {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({"permissionIds": [1]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_body");
}

#[rstest]
#[actix_web::test]
async fn update_with_empty_ids_requests_a_clear(moderator: RoleDetail) {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_update_role()
        .withf(|id, changes| {
            *id == 2 && changes.name.is_none() && changes.permission_ids == Some(Vec::new())
        })
        .return_once(move |_, _| {
            Ok(RoleDetail {
                permissions: Vec::new(),
                permission_count: 0,
                ..moderator
            })
        });

    let (status, body) = call_json(
        ports,
        TestRequest::put()
            .uri("/api/v1/roles/2")
            .set_json(json!({"permissionIds": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn update_conflict_is_409() {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_update_role()
        .withf(|_, changes| changes.name.as_ref().map(|name| name.as_str()) == Some("admin"))
        .return_once(|_, _| Err(Error::conflict("Role with this name already exists")));

    let (status, body) = call_json(
        ports,
        TestRequest::put()
            .uri("/api/v1/roles/2")
            .set_json(json!({"name": "admin"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Role with this name already exists");
}

#[rstest]
#[actix_web::test]
async fn delete_in_use_role_is_409() {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_delete_role()
        .return_once(|_| Err(Error::conflict("Cannot delete role that has associated users")));

    let (status, body) = call_json(ports, TestRequest::delete().uri("/api/v1/roles/1")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete role that has associated users");
}

#[rstest]
#[actix_web::test]
async fn delete_reports_success() {
    let mut ports = MockPorts::default();
    ports.roles.expect_delete_role().return_once(|_| Ok(()));

    let (status, body) = call_json(ports, TestRequest::delete().uri("/api/v1/roles/3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Role deleted successfully"})
    );
}

#[rstest]
#[actix_web::test]
async fn assign_sends_exact_ids(moderator: RoleDetail) {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_assign_permissions()
        .withf(|id, ids| *id == 2 && *ids == vec![3])
        .times(1)
        .return_once(move |_, _| Ok(moderator));

    let (status, body) = call_json(
        ports,
        TestRequest::post()
            .uri("/api/v1/roles/2/permissions")
            .set_json(json!({"permissionIds": [3]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
}

#[rstest]
#[actix_web::test]
async fn assign_unknown_permission_is_400() {
    let mut ports = MockPorts::default();
    ports
        .roles
        .expect_assign_permissions()
        .return_once(|_, _| Err(Error::invalid_request("Permission 99 does not exist")));

    let (status, _) = call_json(
        ports,
        TestRequest::post()
            .uri("/api/v1/roles/2/permissions")
            .set_json(json!({"permissionIds": [99]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn users_for_role_uses_camel_case() {
    let mut ports = MockPorts::default();
    ports.roles_query.expect_users_for_role().return_once(|_| {
        Ok(vec![RoleMember {
            id: 5,
            name: None,
            email: "ada@example.com".into(),
            slack_id: "U05".into(),
        }])
    });

    let (status, body) = call_json(ports, TestRequest::get().uri("/api/v1/roles/1/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 5, "name": null, "email": "ada@example.com", "slackId": "U05"}])
    );
}

#[rstest]
#[actix_web::test]
async fn permissions_for_missing_role_is_404() {
    let mut ports = MockPorts::default();
    ports
        .roles_query
        .expect_permissions_for_role()
        .return_once(|_| Err(Error::not_found("Role not found")));

    let (status, body) =
        call_json(ports, TestRequest::get().uri("/api/v1/roles/77/permissions")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
