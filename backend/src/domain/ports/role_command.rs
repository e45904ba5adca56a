//! Driving port for role mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewRole, RoleChanges, RoleDetail};

/// Driving port for role write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleCommand: Send + Sync {
    /// Create a role and grant its initial permissions.
    ///
    /// Fails with `conflict` for a duplicate name and `invalid_request` for
    /// unknown permission ids.
    async fn create_role(&self, role: NewRole) -> Result<RoleDetail, Error>;

    async fn update_role(&self, id: i32, changes: RoleChanges) -> Result<RoleDetail, Error>;

    /// Delete a role. Fails with `conflict` while users still hold it.
    async fn delete_role(&self, id: i32) -> Result<(), Error>;

    /// Replace the role's permission set.
    async fn assign_permissions(
        &self,
        id: i32,
        permission_ids: Vec<i32>,
    ) -> Result<RoleDetail, Error>;
}
