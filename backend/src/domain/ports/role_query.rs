//! Driving port for role reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, Permission, RoleDetail, RoleListing, RoleMember};

/// Driving port for role read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleQuery: Send + Sync {
    async fn list_roles(&self, page: PageRequest) -> Result<Paginated<RoleListing>, Error>;

    async fn get_role(&self, id: i32) -> Result<RoleDetail, Error>;

    async fn permissions_for_role(&self, id: i32) -> Result<Vec<Permission>, Error>;

    async fn users_for_role(&self, id: i32) -> Result<Vec<RoleMember>, Error>;
}
