//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data<HttpState>` and only ever see
//! the driving ports, so they stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{
    PermissionCommand, PermissionQuery, RoleCommand, RoleQuery, UserCommand, UserQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use rbac_api::domain::{PermissionService, RoleService, UserService};
/// use rbac_api::inbound::http::state::HttpState;
/// use rbac_api::outbound::hashing::{Argon2Config, Argon2PasswordHasher};
/// use rbac_api::outbound::persistence::{
///     DbPool, DieselPermissionRepository, DieselRoleRepository, DieselUserRepository,
///     PoolConfig,
/// };
///
/// # async fn build() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/rbac")).await?;
/// let permissions = Arc::new(PermissionService::new(Arc::new(
///     DieselPermissionRepository::new(pool.clone()),
/// )));
/// let roles = Arc::new(RoleService::new(Arc::new(DieselRoleRepository::new(pool.clone()))));
/// let users = Arc::new(UserService::new(
///     Arc::new(DieselUserRepository::new(pool)),
///     Arc::new(Argon2PasswordHasher::new(Argon2Config::default())?),
///     Arc::new(DefaultClock),
/// ));
/// let state = HttpState {
///     permissions: permissions.clone(),
///     permissions_query: permissions,
///     roles: roles.clone(),
///     roles_query: roles,
///     users: users.clone(),
///     users_query: users,
/// };
/// # let _ = state;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub permissions: Arc<dyn PermissionCommand>,
    pub permissions_query: Arc<dyn PermissionQuery>,
    pub roles: Arc<dyn RoleCommand>,
    pub roles_query: Arc<dyn RoleQuery>,
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
}
