//! Role data model.

use std::fmt;

use crate::domain::Permission;

/// Validated role name.
///
/// Names are compared case-sensitively and must contain at least one
/// non-whitespace character.
///
/// # Examples
/// ```
/// use rbac_api::domain::RoleName;
///
/// assert!(RoleName::new("admin").is_ok());
/// assert!(RoleName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleName(String);

/// Raised when a role name is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("role name must not be empty")]
pub struct EmptyRoleName;

impl RoleName {
    /// Validate and wrap a role name.
    pub fn new(name: impl Into<String>) -> Result<Self, EmptyRoleName> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EmptyRoleName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal role reference embedded in other resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    pub id: i32,
    pub name: String,
}

/// Role annotated with association counts for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListing {
    pub role: RoleSummary,
    pub permission_count: i64,
    pub user_count: i64,
}

/// Role with its permission set flattened out of the association table.
///
/// `permissions` is ordered by permission id. The counts are read in the same
/// transaction as the permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDetail {
    pub id: i32,
    pub name: String,
    pub permissions: Vec<Permission>,
    pub permission_count: i64,
    pub user_count: i64,
}

/// User projection returned when listing a role's members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMember {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
    pub slack_id: String,
}

/// Input for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: RoleName,
    /// Permission ids granted at creation. Empty grants nothing.
    pub permission_ids: Vec<i32>,
}

/// Partial update for a role.
///
/// `permission_ids: Some(vec![])` clears the permission set; `None` leaves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    pub name: Option<RoleName>,
    pub permission_ids: Option<Vec<i32>>,
}

/// Outcome of an attempted role deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDeletion {
    Deleted,
    NotFound,
    /// Users still reference the role, so nothing was removed.
    InUse { user_count: i64 },
}
