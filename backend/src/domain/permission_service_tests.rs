//! Tests for the permission service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockPermissionRepository;
use crate::domain::{ErrorCode, Permission};

#[fixture]
fn listing() -> PermissionListing {
    PermissionListing {
        permission: Permission {
            id: 3,
            name: PermissionName::ReadRoles,
            description: Some("Read roles".to_owned()),
        },
        role_count: 2,
    }
}

fn service(repo: MockPermissionRepository) -> PermissionService<MockPermissionRepository> {
    PermissionService::new(Arc::new(repo))
}

#[rstest]
#[tokio::test]
async fn list_wraps_rows_with_page_meta(listing: PermissionListing) {
    let page = PageRequest::new(2, 1).expect("valid page");
    let mut repo = MockPermissionRepository::new();
    repo.expect_list()
        .with(eq(page))
        .times(1)
        .return_once(move |_| Ok((vec![listing], 3)));

    let result = service(repo)
        .list_permissions(page)
        .await
        .expect("list succeeds");

    assert_eq!(result.data().len(), 1);
    assert_eq!(result.meta().total(), 3);
    assert_eq!(result.meta().total_pages(), 3);
}

#[rstest]
#[tokio::test]
async fn get_returns_not_found_when_missing() {
    let mut repo = MockPermissionRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .get_permission(9)
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Permission not found");
}

#[rstest]
#[tokio::test]
async fn create_maps_duplicate_name_to_conflict() {
    let mut repo = MockPermissionRepository::new();
    repo.expect_create()
        .times(1)
        .return_once(|_| Err(PermissionRepositoryError::duplicate_name("READ_USERS")));

    let error = service(repo)
        .create_permission(NewPermission {
            name: PermissionName::ReadUsers,
            description: None,
        })
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Permission with this name already exists");
}

#[rstest]
#[tokio::test]
async fn update_passes_cleared_description_through(listing: PermissionListing) {
    let mut repo = MockPermissionRepository::new();
    repo.expect_update()
        .withf(|id, changes| *id == 3 && changes.description == Some(None))
        .times(1)
        .return_once(move |_, _| Ok(Some(listing)));

    let updated = service(repo)
        .update_permission(
            3,
            PermissionChanges {
                description: Some(None),
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.permission.id, 3);
}

#[rstest]
#[tokio::test]
async fn update_returns_not_found_when_missing() {
    let mut repo = MockPermissionRepository::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(None));

    let error = service(repo)
        .update_permission(1, PermissionChanges::default())
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_rows(#[case] deleted: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockPermissionRepository::new();
    repo.expect_delete()
        .with(eq(5))
        .times(1)
        .return_once(move |_| Ok(deleted));

    let result = service(repo).delete_permission(5).await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn roles_for_missing_permission_is_not_found() {
    let mut repo = MockPermissionRepository::new();
    repo.expect_list_roles().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .roles_for_permission(4)
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
fn names_do_not_touch_the_repository() {
    let repo = MockPermissionRepository::new();
    let names = service(repo).permission_names();
    assert_eq!(names.len(), PermissionName::ALL.len());
    assert_eq!(names.first(), Some(&PermissionName::ReadUsers));
}

#[rstest]
#[case(
    PermissionRepositoryError::connection("refused"),
    ErrorCode::ServiceUnavailable
)]
#[case(PermissionRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn infrastructure_errors_are_mapped(
    #[case] failure: PermissionRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockPermissionRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = service(repo).get_permission(1).await.expect_err("failure");

    assert_eq!(error.code(), expected);
}
