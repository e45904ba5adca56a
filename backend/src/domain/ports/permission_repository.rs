//! Port for permission persistence and association reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{NewPermission, PermissionChanges, PermissionListing, RoleSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by permission repository adapters.
    pub enum PermissionRepositoryError for "permission repository" {
        /// Another permission already uses this name.
        DuplicateName { name: String } =>
            "permission name already exists: {name}",
    }
}

/// Port for reading and writing permissions.
///
/// Implementations must run each mutation's existence or uniqueness check in
/// the same transaction as the mutation itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// One page of permissions ordered by id, plus the total row count.
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<PermissionListing>, u64), PermissionRepositoryError>;

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<PermissionListing>, PermissionRepositoryError>;

    /// Insert a permission, failing with `DuplicateName` if the name is taken.
    async fn create(
        &self,
        permission: &NewPermission,
    ) -> Result<PermissionListing, PermissionRepositoryError>;

    /// Apply `changes`, returning `None` when the permission does not exist.
    async fn update(
        &self,
        id: i32,
        changes: &PermissionChanges,
    ) -> Result<Option<PermissionListing>, PermissionRepositoryError>;

    /// Delete a permission and its role grants. Returns `false` when absent.
    async fn delete(&self, id: i32) -> Result<bool, PermissionRepositoryError>;

    /// Roles granting the permission ordered by role id, or `None` when the
    /// permission does not exist.
    async fn list_roles(
        &self,
        id: i32,
    ) -> Result<Option<Vec<RoleSummary>>, PermissionRepositoryError>;
}
