//! Documentation-only mirrors of domain wire types.
//!
//! The domain does not depend on utoipa, so each type that appears in a
//! request or response body gets a stand-in here with the same JSON shape.

use utoipa::ToSchema;

/// Documents [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed body, path or query, or a field failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No usable credentials.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Credentials lack the required permission.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// No user, role or permission with that id.
    #[schema(rename = "not_found")]
    NotFound,
    /// Duplicate name or identity, or a role still has members.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service (usually the database) is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Anything else; the message is redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Documents the [`crate::domain::Error`] envelope.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "fields are read by the ToSchema derive only"
)]
pub struct ErrorSchema {
    /// See [`ErrorCodeSchema`].
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Message safe to show to API consumers.
    #[schema(example = "Role not found")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{field, code, value}`.
    details: Option<serde_json::Value>,
}

/// Documents [`crate::domain::PermissionName`].
#[derive(ToSchema)]
#[schema(as = PermissionName)]
pub enum PermissionNameSchema {
    #[schema(rename = "READ_USERS")]
    ReadUsers,
    #[schema(rename = "WRITE_USERS")]
    WriteUsers,
    #[schema(rename = "DELETE_USERS")]
    DeleteUsers,
    #[schema(rename = "READ_ROLES")]
    ReadRoles,
    #[schema(rename = "WRITE_ROLES")]
    WriteRoles,
    #[schema(rename = "DELETE_ROLES")]
    DeleteRoles,
    #[schema(rename = "READ_PERMISSIONS")]
    ReadPermissions,
    #[schema(rename = "WRITE_PERMISSIONS")]
    WritePermissions,
    #[schema(rename = "AWARD_POINTS")]
    AwardPoints,
    #[schema(rename = "VIEW_RANKINGS")]
    ViewRankings,
}

/// Documents [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = PageMeta, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "fields are read by the ToSchema derive only"
)]
pub struct PageMetaSchema {
    /// Rows across all pages.
    #[schema(example = 21)]
    total: u64,
    /// One-based page number.
    #[schema(example = 1)]
    page: u32,
    /// Page size.
    #[schema(example = 10)]
    limit: u32,
    /// `ceil(total / limit)`.
    #[schema(example = 3)]
    total_pages: u64,
}
