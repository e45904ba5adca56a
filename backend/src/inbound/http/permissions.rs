//! Permission HTTP handlers.
//!
//! ```text
//! GET    /api/v1/permissions
//! GET    /api/v1/permissions/names
//! GET    /api/v1/permissions/{id}
//! POST   /api/v1/permissions
//! PUT    /api/v1/permissions/{id}
//! DELETE /api/v1/permissions/{id}
//! GET    /api/v1/permissions/{id}/roles
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewPermission, PermissionChanges, PermissionListing, PermissionName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::roles::RoleSummaryResponse;
use crate::inbound::http::schemas::{ErrorSchema, PageMetaSchema, PermissionNameSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, PageQuery, deserialize_some, parse_id, parse_permission_name,
};
use crate::inbound::http::DeletionResponse;

const ID: FieldName = FieldName::new("id");

/// Request body for `POST /api/v1/permissions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionRequest {
    /// One of the fixed permission names.
    #[schema(example = "READ_USERS")]
    pub name: String,
    pub description: Option<String>,
}

/// Request body for `PUT /api/v1/permissions/{id}`.
///
/// Only the description is mutable. `null` clears it; omitting the field
/// leaves it unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCountResponse {
    pub roles: i64,
}

/// A permission with the number of roles granting it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(value_type = PermissionNameSchema)]
    pub name: PermissionName,
    pub description: Option<String>,
    #[serde(rename = "_count")]
    pub count: RoleCountResponse,
}

impl From<PermissionListing> for PermissionResponse {
    fn from(value: PermissionListing) -> Self {
        let PermissionListing {
            permission,
            role_count,
        } = value;
        Self {
            id: permission.id,
            name: permission.name,
            description: permission.description,
            count: RoleCountResponse { roles: role_count },
        }
    }
}

/// Page of permissions.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionPage {
    pub data: Vec<PermissionResponse>,
    #[schema(value_type = PageMetaSchema)]
    pub meta: pagination::PageMeta,
}

/// List permissions, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/permissions",
    params(PageQuery),
    responses(
        (status = 200, description = "Permissions page", body = PermissionPage),
        (status = 400, description = "Invalid page or limit", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["permissions"],
    operation_id = "listPermissions"
)]
#[get("/permissions")]
pub async fn list_permissions(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<PermissionPage>> {
    let page = query.into_inner().into_page_request()?;
    let (data, meta) = state
        .permissions_query
        .list_permissions(page)
        .await?
        .map(PermissionResponse::from)
        .into_parts();
    Ok(web::Json(PermissionPage { data, meta }))
}

/// The fixed set of permission names.
#[utoipa::path(
    get,
    path = "/api/v1/permissions/names",
    responses(
        (status = 200, description = "Permission names", body = [PermissionNameSchema])
    ),
    tags = ["permissions"],
    operation_id = "listPermissionNames"
)]
#[get("/permissions/names")]
pub async fn permission_names(state: web::Data<HttpState>) -> web::Json<Vec<PermissionName>> {
    web::Json(state.permissions_query.permission_names())
}

/// Fetch one permission.
#[utoipa::path(
    get,
    path = "/api/v1/permissions/{id}",
    params(("id" = i32, Path, description = "Permission id")),
    responses(
        (status = 200, description = "Permission", body = PermissionResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Permission not found", body = ErrorSchema)
    ),
    tags = ["permissions"],
    operation_id = "getPermission"
)]
#[get("/permissions/{id}")]
pub async fn get_permission(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PermissionResponse>> {
    let id = parse_id(&path, ID)?;
    let listing = state.permissions_query.get_permission(id).await?;
    Ok(web::Json(listing.into()))
}

/// Create a permission.
#[utoipa::path(
    post,
    path = "/api/v1/permissions",
    request_body = CreatePermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = PermissionResponse),
        (status = 400, description = "Invalid permission name", body = ErrorSchema),
        (status = 409, description = "Permission with this name already exists", body = ErrorSchema)
    ),
    tags = ["permissions"],
    operation_id = "createPermission"
)]
#[post("/permissions")]
pub async fn create_permission(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePermissionRequest>,
) -> ApiResult<HttpResponse> {
    let CreatePermissionRequest { name, description } = payload.into_inner();
    let permission = NewPermission {
        name: parse_permission_name(&name, FieldName::new("name"))?,
        description,
    };
    let created = state.permissions.create_permission(permission).await?;
    Ok(HttpResponse::Created().json(PermissionResponse::from(created)))
}

/// Update a permission's description.
#[utoipa::path(
    put,
    path = "/api/v1/permissions/{id}",
    params(("id" = i32, Path, description = "Permission id")),
    request_body = UpdatePermissionRequest,
    responses(
        (status = 200, description = "Permission updated", body = PermissionResponse),
        (status = 400, description = "Invalid id or body", body = ErrorSchema),
        (status = 404, description = "Permission not found", body = ErrorSchema)
    ),
    tags = ["permissions"],
    operation_id = "updatePermission"
)]
#[put("/permissions/{id}")]
pub async fn update_permission(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePermissionRequest>,
) -> ApiResult<web::Json<PermissionResponse>> {
    let id = parse_id(&path, ID)?;
    let changes = PermissionChanges {
        description: payload.into_inner().description,
    };
    let updated = state.permissions.update_permission(id, changes).await?;
    Ok(web::Json(updated.into()))
}

/// Delete a permission. Grants referencing it are removed as well.
#[utoipa::path(
    delete,
    path = "/api/v1/permissions/{id}",
    params(("id" = i32, Path, description = "Permission id")),
    responses(
        (status = 200, description = "Permission deleted", body = DeletionResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Permission not found", body = ErrorSchema)
    ),
    tags = ["permissions"],
    operation_id = "deletePermission"
)]
#[delete("/permissions/{id}")]
pub async fn delete_permission(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletionResponse>> {
    let id = parse_id(&path, ID)?;
    state.permissions.delete_permission(id).await?;
    Ok(web::Json(DeletionResponse::new(
        "Permission deleted successfully",
    )))
}

/// Roles granting a permission, ordered by role id.
#[utoipa::path(
    get,
    path = "/api/v1/permissions/{id}/roles",
    params(("id" = i32, Path, description = "Permission id")),
    responses(
        (status = 200, description = "Roles with this permission", body = [RoleSummaryResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Permission not found", body = ErrorSchema)
    ),
    tags = ["permissions"],
    operation_id = "listPermissionRoles"
)]
#[get("/permissions/{id}/roles")]
pub async fn roles_for_permission(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RoleSummaryResponse>>> {
    let id = parse_id(&path, ID)?;
    let roles = state.permissions_query.roles_for_permission(id).await?;
    Ok(web::Json(roles.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
