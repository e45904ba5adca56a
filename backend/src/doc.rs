//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the schema wrappers in [`crate::inbound::http::schemas`], which keep
//! domain types free of utoipa derives.
//!
//! The generated document is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::DeletionResponse;
use crate::inbound::http::permissions::{
    CreatePermissionRequest, PermissionPage, PermissionResponse, RoleCountResponse,
    UpdatePermissionRequest,
};
use crate::inbound::http::roles::{
    AssignPermissionsRequest, CreateRoleRequest, PermissionItem, RoleCounts, RoleDetailResponse,
    RoleListItem, RoleMemberResponse, RolePage, RoleSummaryResponse, UpdateRoleRequest,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, PageMetaSchema, PermissionNameSchema,
};
use crate::inbound::http::users::{
    CreateUserRequest, PendingRankingResponse, PointsHistoryItem, RankingResponse,
    UpdateUserRequest, UserPage, UserRankingResponse, UserResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RBAC API",
        description = "Users, roles and permissions with monthly points rankings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::user_ranking,
        crate::inbound::http::users::points_history,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::roles::get_role,
        crate::inbound::http::roles::create_role,
        crate::inbound::http::roles::update_role,
        crate::inbound::http::roles::delete_role,
        crate::inbound::http::roles::assign_permissions,
        crate::inbound::http::roles::permissions_for_role,
        crate::inbound::http::roles::users_for_role,
        crate::inbound::http::permissions::list_permissions,
        crate::inbound::http::permissions::permission_names,
        crate::inbound::http::permissions::get_permission,
        crate::inbound::http::permissions::create_permission,
        crate::inbound::http::permissions::update_permission,
        crate::inbound::http::permissions::delete_permission,
        crate::inbound::http::permissions::roles_for_permission,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PageMetaSchema,
        PermissionNameSchema,
        DeletionResponse,
        UserResponse,
        UserPage,
        CreateUserRequest,
        UpdateUserRequest,
        UserRankingResponse,
        RankingResponse,
        PendingRankingResponse,
        PointsHistoryItem,
        RoleSummaryResponse,
        RoleListItem,
        RoleCounts,
        RolePage,
        RoleDetailResponse,
        RoleMemberResponse,
        PermissionItem,
        CreateRoleRequest,
        UpdateRoleRequest,
        AssignPermissionsRequest,
        PermissionResponse,
        RoleCountResponse,
        PermissionPage,
        CreatePermissionRequest,
        UpdatePermissionRequest,
    )),
    tags(
        (name = "users", description = "User accounts, rankings and points history"),
        (name = "roles", description = "Roles and their permission sets"),
        (name = "permissions", description = "The fixed permission catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
