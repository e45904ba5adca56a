//! Role domain service.
//!
//! Implements the role driving ports. Uniqueness and existence checks happen
//! inside the repository's transactions; this layer normalises permission id
//! sets and turns repository outcomes into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{RoleCommand, RoleQuery, RoleRepository, RoleRepositoryError};
use crate::domain::{
    Error, NewRole, Permission, RoleChanges, RoleDeletion, RoleDetail, RoleListing, RoleMember,
};

const NOT_FOUND: &str = "Role not found";
const DUPLICATE_NAME: &str = "Role with this name already exists";
const HAS_USERS: &str = "Cannot delete role that has associated users";

fn map_repository_error(error: RoleRepositoryError) -> Error {
    match error {
        RoleRepositoryError::Connection { .. } => Error::storage_unavailable(),
        RoleRepositoryError::Query { message } => {
            Error::internal(format!("role repository error: {message}"))
        }
        RoleRepositoryError::DuplicateName { .. } => Error::conflict(DUPLICATE_NAME),
        RoleRepositoryError::UnknownPermission { id } => {
            Error::invalid_field(
                format!("Permission {id} does not exist"),
                "permissionIds",
                "unknown_permission",
                id,
            )
        }
    }
}

/// Sort and deduplicate a permission id set so repeated ids grant once.
fn normalise_ids(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Role service implementing [`RoleCommand`] and [`RoleQuery`].
#[derive(Clone)]
pub struct RoleService<R> {
    role_repo: Arc<R>,
}

impl<R> RoleService<R> {
    pub fn new(role_repo: Arc<R>) -> Self {
        Self { role_repo }
    }
}

#[async_trait]
impl<R> RoleCommand for RoleService<R>
where
    R: RoleRepository,
{
    async fn create_role(&self, role: NewRole) -> Result<RoleDetail, Error> {
        let role = NewRole {
            permission_ids: normalise_ids(role.permission_ids),
            ..role
        };
        self.role_repo
            .create(&role)
            .await
            .map_err(map_repository_error)
    }

    async fn update_role(&self, id: i32, changes: RoleChanges) -> Result<RoleDetail, Error> {
        let changes = RoleChanges {
            permission_ids: changes.permission_ids.map(normalise_ids),
            ..changes
        };
        self.role_repo
            .update(id, &changes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete_role(&self, id: i32) -> Result<(), Error> {
        match self
            .role_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
        {
            RoleDeletion::Deleted => Ok(()),
            RoleDeletion::NotFound => Err(Error::not_found(NOT_FOUND)),
            RoleDeletion::InUse { user_count } => {
                tracing::debug!(role_id = id, user_count, "role delete blocked by members");
                Err(Error::conflict(HAS_USERS))
            }
        }
    }

    async fn assign_permissions(
        &self,
        id: i32,
        permission_ids: Vec<i32>,
    ) -> Result<RoleDetail, Error> {
        let permission_ids = normalise_ids(permission_ids);
        self.role_repo
            .replace_permissions(id, &permission_ids)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[async_trait]
impl<R> RoleQuery for RoleService<R>
where
    R: RoleRepository,
{
    async fn list_roles(&self, page: PageRequest) -> Result<Paginated<RoleListing>, Error> {
        let (items, total) = self
            .role_repo
            .list(page)
            .await
            .map_err(map_repository_error)?;
        Ok(Paginated::new(items, page, total))
    }

    async fn get_role(&self, id: i32) -> Result<RoleDetail, Error> {
        self.role_repo
            .find_detail(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn permissions_for_role(&self, id: i32) -> Result<Vec<Permission>, Error> {
        self.role_repo
            .list_permissions(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn users_for_role(&self, id: i32) -> Result<Vec<RoleMember>, Error> {
        self.role_repo
            .list_users(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "role_service_tests.rs"]
mod tests;
