//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed RBAC entities (users, roles,
//! permissions and monthly ranking snapshots) together with the services that
//! enforce their business rules. Nothing here knows about HTTP or SQL;
//! adapters talk to the domain through the traits in [`ports`].
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload and its code.
//! - TraceId: per-request correlation identifier held in a task-local.
//! - PermissionService, RoleService, UserService: driving port
//!   implementations.

pub mod error;
pub mod permission;
mod permission_service;
pub mod ports;
pub mod ranking;
pub mod role;
mod role_service;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::permission::{
    NewPermission, ParsePermissionNameError, Permission, PermissionChanges, PermissionListing,
    PermissionName,
};
pub use self::permission_service::PermissionService;
pub use self::ranking::{
    DEFAULT_HISTORY_LIMIT, MonthlyPoints, Ranking, RankingPeriod, UserRanking,
};
pub use self::role::{
    EmptyRoleName, NewRole, RoleChanges, RoleDeletion, RoleDetail, RoleListing, RoleMember,
    RoleName, RoleSummary,
};
pub use self::role_service::RoleService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, SlackId, UserChanges, UserDraft, UserPatch, UserProfile,
    UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use rbac_api::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("Role not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
