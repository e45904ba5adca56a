//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;

pub use error::ApiResult;

/// Body returned by every successful `DELETE`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletionResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Role deleted successfully")]
    pub message: String,
}

impl DeletionResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Register the `/api/v1` handlers and extractor error handlers.
///
/// Mount inside the versioned scope:
///
/// ```no_run
/// use actix_web::{App, web};
/// use rbac_api::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::user_ranking)
        .service(users::points_history)
        .service(roles::list_roles)
        .service(roles::create_role)
        .service(roles::get_role)
        .service(roles::update_role)
        .service(roles::delete_role)
        .service(roles::assign_permissions)
        .service(roles::permissions_for_role)
        .service(roles::users_for_role)
        .service(permissions::list_permissions)
        // Must precede `/permissions/{id}`.
        .service(permissions::permission_names)
        .service(permissions::create_permission)
        .service(permissions::get_permission)
        .service(permissions::update_permission)
        .service(permissions::delete_permission)
        .service(permissions::roles_for_permission);
}
