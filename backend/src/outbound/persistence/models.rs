//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    MonthlyPoints, ParsePermissionNameError, Permission, Ranking, RankingPeriod, RoleMember,
    RoleSummary, UserProfile,
};

use super::schema::{monthly_points, permissions, rankings, role_permissions, roles, users};

// ---------------------------------------------------------------------------
// Roles and permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: i32,
    pub name: String,
}

impl From<RoleRow> for RoleSummary {
    fn from(row: RoleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = roles)]
pub(crate) struct NewRoleRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the permissions table.
///
/// `name` stays textual here and is parsed on conversion, so an unexpected
/// value surfaces as a query error rather than a panic.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = permissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PermissionRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = ParsePermissionNameError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name.parse()?,
            description: row.description,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = permissions)]
pub(crate) struct NewPermissionRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// Changeset for permission updates.
///
/// The outer `Option` skips the column; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = permissions)]
pub(crate) struct PermissionUpdate<'a> {
    pub description: Option<Option<&'a str>>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = role_permissions)]
pub(crate) struct RolePermissionRow {
    pub role_id: i32,
    pub permission_id: i32,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading users. The password hash is never selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub slack_id: String,
    pub name: Option<String>,
    pub email: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_profile(self, role: RoleRow) -> UserProfile {
        UserProfile {
            id: self.id,
            slack_id: self.slack_id,
            name: self.name,
            email: self.email,
            points: self.points,
            created_at: self.created_at,
            role: role.into(),
        }
    }
}

impl From<UserRow> for RoleMember {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            slack_id: row.slack_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub slack_id: &'a str,
    pub name: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub role_id: i32,
}

/// Changeset for partial user updates. `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: Option<Option<&'a str>>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role_id: Option<i32>,
    pub points: Option<i32>,
}

impl UserUpdate<'_> {
    /// Diesel rejects an empty changeset, so callers skip the statement.
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role_id.is_none()
            && self.points.is_none()
    }
}

// ---------------------------------------------------------------------------
// Monthly snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rankings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RankingRow {
    pub user_id: i32,
    pub year: i32,
    pub month: i32,
    pub rank: i32,
    pub points: i32,
}

impl From<RankingRow> for Ranking {
    fn from(row: RankingRow) -> Self {
        Self {
            user_id: row.user_id,
            rank: row.rank,
            points: row.points,
            period: RankingPeriod {
                year: row.year,
                month: row.month,
            },
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = monthly_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MonthlyPointsRow {
    pub user_id: i32,
    pub year: i32,
    pub month: i32,
    pub points: i32,
}

impl From<MonthlyPointsRow> for MonthlyPoints {
    fn from(row: MonthlyPointsRow) -> Self {
        Self {
            user_id: row.user_id,
            points: row.points,
            period: RankingPeriod {
                year: row.year,
                month: row.month,
            },
        }
    }
}
