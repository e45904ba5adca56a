//! Role HTTP handlers.
//!
//! ```text
//! GET    /api/v1/roles
//! GET    /api/v1/roles/{id}
//! POST   /api/v1/roles
//! PUT    /api/v1/roles/{id}
//! DELETE /api/v1/roles/{id}
//! POST   /api/v1/roles/{id}/permissions
//! GET    /api/v1/roles/{id}/permissions
//! GET    /api/v1/roles/{id}/users
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    NewRole, Permission, PermissionName, RoleChanges, RoleDetail, RoleListing, RoleMember,
    RoleSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::DeletionResponse;
use crate::inbound::http::schemas::{ErrorSchema, PageMetaSchema, PermissionNameSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, parse_id, parse_role_name};

const ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");

/// Minimal role reference.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleSummaryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "admin")]
    pub name: String,
}

impl From<RoleSummary> for RoleSummaryResponse {
    fn from(value: RoleSummary) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// Permission as embedded in role payloads.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionItem {
    pub id: i32,
    #[schema(value_type = PermissionNameSchema)]
    pub name: PermissionName,
    pub description: Option<String>,
}

impl From<Permission> for PermissionItem {
    fn from(value: Permission) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCounts {
    pub permissions: i64,
    pub users: i64,
}

/// Role row in a listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleListItem {
    pub id: i32,
    pub name: String,
    #[serde(rename = "_count")]
    pub count: RoleCounts,
}

impl From<RoleListing> for RoleListItem {
    fn from(value: RoleListing) -> Self {
        Self {
            id: value.role.id,
            name: value.role.name,
            count: RoleCounts {
                permissions: value.permission_count,
                users: value.user_count,
            },
        }
    }
}

/// Role with its flattened permission set, ordered by permission id.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleDetailResponse {
    pub id: i32,
    pub name: String,
    pub permissions: Vec<PermissionItem>,
    #[serde(rename = "_count")]
    pub count: RoleCounts,
}

impl From<RoleDetail> for RoleDetailResponse {
    fn from(value: RoleDetail) -> Self {
        Self {
            id: value.id,
            name: value.name,
            permissions: value.permissions.into_iter().map(Into::into).collect(),
            count: RoleCounts {
                permissions: value.permission_count,
                users: value.user_count,
            },
        }
    }
}

/// Page of roles.
#[derive(Debug, Serialize, ToSchema)]
pub struct RolePage {
    pub data: Vec<RoleListItem>,
    #[schema(value_type = PageMetaSchema)]
    pub meta: pagination::PageMeta,
}

/// User holding a role.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleMemberResponse {
    pub id: i32,
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "U024BE7LH")]
    pub slack_id: String,
}

impl From<RoleMember> for RoleMemberResponse {
    fn from(value: RoleMember) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            slack_id: value.slack_id,
        }
    }
}

/// Request body for `POST /api/v1/roles`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[schema(example = "moderator")]
    pub name: String,
    #[serde(default)]
    pub permission_ids: Option<Vec<i32>>,
}

/// Request body for `PUT /api/v1/roles/{id}`.
///
/// A supplied `permissionIds`, even empty, replaces the whole set.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub permission_ids: Option<Vec<i32>>,
}

/// Request body for `POST /api/v1/roles/{id}/permissions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissionsRequest {
    #[schema(example = json!([1, 2, 3]))]
    pub permission_ids: Vec<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    params(PageQuery),
    responses(
        (status = 200, description = "Roles page", body = RolePage),
        (status = 400, description = "Invalid page or limit", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "listRoles"
)]
#[get("/roles")]
pub async fn list_roles(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<RolePage>> {
    let page = query.into_inner().into_page_request()?;
    let (data, meta) = state
        .roles_query
        .list_roles(page)
        .await?
        .map(RoleListItem::from)
        .into_parts();
    Ok(web::Json(RolePage { data, meta }))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role with permissions", body = RoleDetailResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Role not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "getRole"
)]
#[get("/roles/{id}")]
pub async fn get_role(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RoleDetailResponse>> {
    let id = parse_id(&path, ID)?;
    let detail = state.roles_query.get_role(id).await?;
    Ok(web::Json(detail.into()))
}

/// Create a role, optionally granting permissions in the same transaction.
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleDetailResponse),
        (status = 400, description = "Blank name or unknown permission id", body = ErrorSchema),
        (status = 409, description = "Role with this name already exists", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "createRole"
)]
#[post("/roles")]
pub async fn create_role(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRoleRequest>,
) -> ApiResult<HttpResponse> {
    let CreateRoleRequest {
        name,
        permission_ids,
    } = payload.into_inner();
    let role = NewRole {
        name: parse_role_name(name, NAME)?,
        permission_ids: permission_ids.unwrap_or_default(),
    };
    let created = state.roles.create_role(role).await?;
    Ok(HttpResponse::Created().json(RoleDetailResponse::from(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleDetailResponse),
        (status = 400, description = "Invalid id or body", body = ErrorSchema),
        (status = 404, description = "Role not found", body = ErrorSchema),
        (status = 409, description = "Role with this name already exists", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "updateRole"
)]
#[put("/roles/{id}")]
pub async fn update_role(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateRoleRequest>,
) -> ApiResult<web::Json<RoleDetailResponse>> {
    let id = parse_id(&path, ID)?;
    let UpdateRoleRequest {
        name,
        permission_ids,
    } = payload.into_inner();
    let changes = RoleChanges {
        name: name.map(|raw| parse_role_name(raw, NAME)).transpose()?,
        permission_ids,
    };
    let updated = state.roles.update_role(id, changes).await?;
    Ok(web::Json(updated.into()))
}

/// Delete a role. Refused while any user still holds it.
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role deleted", body = DeletionResponse),
        (status = 404, description = "Role not found", body = ErrorSchema),
        (status = 409, description = "Cannot delete role that has associated users", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "deleteRole"
)]
#[delete("/roles/{id}")]
pub async fn delete_role(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletionResponse>> {
    let id = parse_id(&path, ID)?;
    state.roles.delete_role(id).await?;
    Ok(web::Json(DeletionResponse::new("Role deleted successfully")))
}

/// Replace the role's permission set with exactly `permissionIds`.
#[utoipa::path(
    post,
    path = "/api/v1/roles/{id}/permissions",
    params(("id" = i32, Path, description = "Role id")),
    request_body = AssignPermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced", body = RoleDetailResponse),
        (status = 400, description = "Unknown permission id", body = ErrorSchema),
        (status = 404, description = "Role not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "assignRolePermissions"
)]
#[post("/roles/{id}/permissions")]
pub async fn assign_permissions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AssignPermissionsRequest>,
) -> ApiResult<web::Json<RoleDetailResponse>> {
    let id = parse_id(&path, ID)?;
    let detail = state
        .roles
        .assign_permissions(id, payload.into_inner().permission_ids)
        .await?;
    Ok(web::Json(detail.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}/permissions",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Permissions granted by the role", body = [PermissionItem]),
        (status = 404, description = "Role not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "listRolePermissions"
)]
#[get("/roles/{id}/permissions")]
pub async fn permissions_for_role(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PermissionItem>>> {
    let id = parse_id(&path, ID)?;
    let permissions = state.roles_query.permissions_for_role(id).await?;
    Ok(web::Json(permissions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}/users",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Users holding the role", body = [RoleMemberResponse]),
        (status = 404, description = "Role not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "listRoleUsers"
)]
#[get("/roles/{id}/users")]
pub async fn users_for_role(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RoleMemberResponse>>> {
    let id = parse_id(&path, ID)?;
    let members = state.roles_query.users_for_role(id).await?;
    Ok(web::Json(members.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[path = "roles_tests.rs"]
mod tests;
