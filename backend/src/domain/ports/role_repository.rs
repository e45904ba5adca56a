//! Port for role persistence, permission grants and membership reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    NewRole, Permission, RoleChanges, RoleDeletion, RoleDetail, RoleListing, RoleMember,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by role repository adapters.
    pub enum RoleRepositoryError for "role repository" {
        /// Another role already uses this name.
        DuplicateName { name: String } =>
            "role name already exists: {name}",
        /// A permission id in the grant set does not exist.
        UnknownPermission { id: i32 } =>
            "permission {id} does not exist",
    }
}

/// Port for reading and writing roles.
///
/// Every mutation runs as one transaction: the existence check, the
/// uniqueness check and any permission-set replacement either all apply or
/// none do.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// One page of roles ordered by id, plus the total row count.
    async fn list(&self, page: PageRequest)
    -> Result<(Vec<RoleListing>, u64), RoleRepositoryError>;

    /// Role with its permissions ordered by permission id.
    async fn find_detail(&self, id: i32) -> Result<Option<RoleDetail>, RoleRepositoryError>;

    async fn create(&self, role: &NewRole) -> Result<RoleDetail, RoleRepositoryError>;

    /// Rename and/or replace the permission set. Renaming to the current
    /// name is a no-op rather than a conflict.
    async fn update(
        &self,
        id: i32,
        changes: &RoleChanges,
    ) -> Result<Option<RoleDetail>, RoleRepositoryError>;

    /// Delete a role unless users still reference it.
    async fn delete(&self, id: i32) -> Result<RoleDeletion, RoleRepositoryError>;

    /// Replace the full permission set (delete-all then insert-each).
    async fn replace_permissions(
        &self,
        id: i32,
        permission_ids: &[i32],
    ) -> Result<Option<RoleDetail>, RoleRepositoryError>;

    async fn list_permissions(
        &self,
        id: i32,
    ) -> Result<Option<Vec<Permission>>, RoleRepositoryError>;

    /// Users holding the role ordered by user id.
    async fn list_users(&self, id: i32) -> Result<Option<Vec<RoleMember>>, RoleRepositoryError>;
}
