//! Driving port for permission mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewPermission, PermissionChanges, PermissionListing};

/// Driving port for permission write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionCommand: Send + Sync {
    /// Create a permission.
    ///
    /// Fails with `conflict` when the name already exists.
    async fn create_permission(
        &self,
        permission: NewPermission,
    ) -> Result<PermissionListing, Error>;

    /// Update a permission's description. Fails with `not_found` when absent.
    async fn update_permission(
        &self,
        id: i32,
        changes: PermissionChanges,
    ) -> Result<PermissionListing, Error>;

    /// Delete a permission. Fails with `not_found` when absent.
    async fn delete_permission(&self, id: i32) -> Result<(), Error>;
}
