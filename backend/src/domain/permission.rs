//! Permission data model.
//!
//! Permission names form a closed set. They are parsed at every boundary
//! (HTTP bodies, database rows) so the rest of the domain only ever handles
//! known capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of capabilities a role can grant.
///
/// Serialised in `SCREAMING_SNAKE_CASE`.
///
/// # Examples
/// ```
/// use rbac_api::domain::PermissionName;
///
/// let name: PermissionName = "READ_USERS".parse().expect("known permission");
/// assert_eq!(name, PermissionName::ReadUsers);
/// assert_eq!(name.as_str(), "READ_USERS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionName {
    /// List and inspect users.
    ReadUsers,
    /// Create and edit users.
    WriteUsers,
    /// Remove users.
    DeleteUsers,
    /// List and inspect roles.
    ReadRoles,
    /// Create and edit roles, including their permission sets.
    WriteRoles,
    /// Remove roles.
    DeleteRoles,
    /// List and inspect permissions.
    ReadPermissions,
    /// Create, edit and remove permissions.
    WritePermissions,
    /// Adjust user point balances.
    AwardPoints,
    /// Read monthly rankings and points history.
    ViewRankings,
}

impl PermissionName {
    /// Every permission name in declaration order.
    pub const ALL: [Self; 10] = [
        Self::ReadUsers,
        Self::WriteUsers,
        Self::DeleteUsers,
        Self::ReadRoles,
        Self::WriteRoles,
        Self::DeleteRoles,
        Self::ReadPermissions,
        Self::WritePermissions,
        Self::AwardPoints,
        Self::ViewRankings,
    ];

    /// Canonical wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadUsers => "READ_USERS",
            Self::WriteUsers => "WRITE_USERS",
            Self::DeleteUsers => "DELETE_USERS",
            Self::ReadRoles => "READ_ROLES",
            Self::WriteRoles => "WRITE_ROLES",
            Self::DeleteRoles => "DELETE_ROLES",
            Self::ReadPermissions => "READ_PERMISSIONS",
            Self::WritePermissions => "WRITE_PERMISSIONS",
            Self::AwardPoints => "AWARD_POINTS",
            Self::ViewRankings => "VIEW_RANKINGS",
        }
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known permission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission name: {value}")]
pub struct ParsePermissionNameError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for PermissionName {
    type Err = ParsePermissionNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParsePermissionNameError {
                value: s.to_owned(),
            })
    }
}

/// Stored permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: i32,
    pub name: PermissionName,
    pub description: Option<String>,
}

/// Permission annotated with the number of roles granting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionListing {
    pub permission: Permission,
    pub role_count: i64,
}

/// Input for creating a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    pub name: PermissionName,
    pub description: Option<String>,
}

/// Partial update for a permission.
///
/// Only the description is mutable. `None` leaves it unchanged;
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionChanges {
    pub description: Option<Option<String>>,
}
