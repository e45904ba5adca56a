//! Permission domain service.
//!
//! Implements the permission driving ports on top of a
//! [`PermissionRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{
    PermissionCommand, PermissionQuery, PermissionRepository, PermissionRepositoryError,
};
use crate::domain::{
    Error, NewPermission, PermissionChanges, PermissionListing, PermissionName, RoleSummary,
};

const NOT_FOUND: &str = "Permission not found";
const DUPLICATE_NAME: &str = "Permission with this name already exists";

fn map_repository_error(error: PermissionRepositoryError) -> Error {
    match error {
        PermissionRepositoryError::Connection { .. } => Error::storage_unavailable(),
        PermissionRepositoryError::Query { message } => {
            Error::internal(format!("permission repository error: {message}"))
        }
        PermissionRepositoryError::DuplicateName { .. } => Error::conflict(DUPLICATE_NAME),
    }
}

/// Permission service implementing [`PermissionCommand`] and
/// [`PermissionQuery`].
#[derive(Clone)]
pub struct PermissionService<R> {
    permission_repo: Arc<R>,
}

impl<R> PermissionService<R> {
    pub fn new(permission_repo: Arc<R>) -> Self {
        Self { permission_repo }
    }
}

#[async_trait]
impl<R> PermissionCommand for PermissionService<R>
where
    R: PermissionRepository,
{
    async fn create_permission(
        &self,
        permission: NewPermission,
    ) -> Result<PermissionListing, Error> {
        self.permission_repo
            .create(&permission)
            .await
            .map_err(map_repository_error)
    }

    async fn update_permission(
        &self,
        id: i32,
        changes: PermissionChanges,
    ) -> Result<PermissionListing, Error> {
        self.permission_repo
            .update(id, &changes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete_permission(&self, id: i32) -> Result<(), Error> {
        let deleted = self
            .permission_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[async_trait]
impl<R> PermissionQuery for PermissionService<R>
where
    R: PermissionRepository,
{
    async fn list_permissions(
        &self,
        page: PageRequest,
    ) -> Result<Paginated<PermissionListing>, Error> {
        let (items, total) = self
            .permission_repo
            .list(page)
            .await
            .map_err(map_repository_error)?;
        Ok(Paginated::new(items, page, total))
    }

    async fn get_permission(&self, id: i32) -> Result<PermissionListing, Error> {
        self.permission_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn roles_for_permission(&self, id: i32) -> Result<Vec<RoleSummary>, Error> {
        self.permission_repo
            .list_roles(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    fn permission_names(&self) -> Vec<PermissionName> {
        PermissionName::ALL.to_vec()
    }
}

#[cfg(test)]
#[path = "permission_service_tests.rs"]
mod tests;
