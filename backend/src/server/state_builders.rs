//! Builders for the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use rbac_api::domain::{PermissionService, RoleService, UserService};
use rbac_api::inbound::http::state::HttpState;
use rbac_api::outbound::hashing::{Argon2Config, Argon2PasswordHasher};
use rbac_api::outbound::persistence::{
    DieselPermissionRepository, DieselRoleRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wire every service to its Diesel repository. Each service backs both its
/// command and query port.
///
/// # Errors
/// Returns [`std::io::Error`] when the Argon2 parameters are rejected.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let pool = &config.db_pool;
    let hasher = Argon2PasswordHasher::new(Argon2Config::default())
        .map_err(|err| std::io::Error::other(format!("argon2 configuration rejected: {err}")))?;

    let permissions = Arc::new(PermissionService::new(Arc::new(
        DieselPermissionRepository::new(pool.clone()),
    )));
    let roles = Arc::new(RoleService::new(Arc::new(DieselRoleRepository::new(
        pool.clone(),
    ))));
    let users = Arc::new(UserService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(hasher),
        Arc::new(DefaultClock),
    ));

    Ok(web::Data::new(HttpState {
        permissions: permissions.clone(),
        permissions_query: permissions,
        roles: roles.clone(),
        roles_query: roles,
        users: users.clone(),
        users_query: users,
    }))
}
