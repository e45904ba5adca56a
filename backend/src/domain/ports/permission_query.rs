//! Driving port for permission reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, PermissionListing, PermissionName, RoleSummary};

/// Driving port for permission read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionQuery: Send + Sync {
    async fn list_permissions(
        &self,
        page: PageRequest,
    ) -> Result<Paginated<PermissionListing>, Error>;

    async fn get_permission(&self, id: i32) -> Result<PermissionListing, Error>;

    /// Roles granting the permission, ordered by role id.
    async fn roles_for_permission(&self, id: i32) -> Result<Vec<RoleSummary>, Error>;

    /// Every assignable permission name. Never touches storage.
    fn permission_names(&self) -> Vec<PermissionName>;
}
