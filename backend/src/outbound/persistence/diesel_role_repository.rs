//! PostgreSQL-backed `RoleRepository` implementation using Diesel ORM.
//!
//! Mutations lock the role row (`SELECT ... FOR UPDATE`) before checking or
//! changing anything, so a concurrent delete or rename surfaces as a clean
//! `None` / conflict rather than a half-applied change. Replacing a role's
//! permission set deletes every grant and re-inserts the new set inside the
//! same transaction; readers never see the empty intermediate state.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{RoleRepository, RoleRepositoryError};
use crate::domain::{
    NewRole, Permission, RoleChanges, RoleDeletion, RoleDetail, RoleListing, RoleMember,
    RoleSummary,
};

use super::diesel_error_mapping::{TxError, is_unique_violation, pool_error, storage_error};
use super::models::{NewRoleRow, PermissionRow, RolePermissionRow, RoleRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{permissions, role_permissions, roles, users};
use super::{page_limit, page_offset};

/// Diesel-backed implementation of the `RoleRepository` port.
#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// A role row with its granted permissions and member count.
struct DetailRows {
    role: RoleRow,
    permissions: Vec<PermissionRow>,
    user_count: i64,
}

fn map_pool_error(error: PoolError) -> RoleRepositoryError {
    pool_error(error)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> RoleRepositoryError {
    move |error| storage_error(operation, error)
}

/// Map a failed write. A unique violation that slipped past the name check
/// (a concurrent insert) still reports the duplicate role name.
fn map_write_error<'a>(
    operation: &'static str,
    name: Option<&'a str>,
) -> impl FnOnce(TxError<RoleRepositoryError>) -> RoleRepositoryError + 'a {
    move |err| {
        err.resolve(operation, |error| {
            name.filter(|_| is_unique_violation(error))
                .map(RoleRepositoryError::duplicate_name)
        })
    }
}

fn to_permissions(rows: Vec<PermissionRow>) -> Result<Vec<Permission>, RoleRepositoryError> {
    rows.into_iter()
        .map(|row| {
            Permission::try_from(row).map_err(|err| RoleRepositoryError::query(err.to_string()))
        })
        .collect()
}

fn to_detail(rows: DetailRows) -> Result<RoleDetail, RoleRepositoryError> {
    let DetailRows {
        role,
        permissions,
        user_count,
    } = rows;
    let permission_count = i64::try_from(permissions.len()).unwrap_or(i64::MAX);
    Ok(RoleDetail {
        id: role.id,
        name: role.name,
        permissions: to_permissions(permissions)?,
        permission_count,
        user_count,
    })
}

async fn lock_role(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<RoleRow>> {
    roles::table
        .find(id)
        .select(RoleRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()
}

async fn role_exists(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<bool> {
    diesel::select(exists(roles::table.find(id)))
        .get_result(conn)
        .await
}

async fn granted_permissions(
    conn: &mut AsyncPgConnection,
    role_id: i32,
) -> QueryResult<Vec<PermissionRow>> {
    role_permissions::table
        .inner_join(permissions::table)
        .filter(role_permissions::role_id.eq(role_id))
        .select(PermissionRow::as_select())
        .order(permissions::id.asc())
        .load(conn)
        .await
}

async fn member_count(conn: &mut AsyncPgConnection, role_id: i32) -> QueryResult<i64> {
    users::table
        .filter(users::role_id.eq(role_id))
        .count()
        .get_result(conn)
        .await
}

/// Grants and member count of an already loaded `role`.
async fn detail_of(conn: &mut AsyncPgConnection, role: RoleRow) -> QueryResult<DetailRows> {
    let permissions = granted_permissions(conn, role.id).await?;
    let user_count = member_count(conn, role.id).await?;
    Ok(DetailRows {
        role,
        permissions,
        user_count,
    })
}

async fn load_detail(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<DetailRows>> {
    let role = roles::table
        .find(id)
        .select(RoleRow::as_select())
        .first(conn)
        .await
        .optional()?;
    match role {
        Some(role) => Ok(Some(detail_of(conn, role).await?)),
        None => Ok(None),
    }
}

async fn name_taken(
    conn: &mut AsyncPgConnection,
    name: &str,
    excluding: Option<i32>,
) -> QueryResult<bool> {
    let mut query = roles::table.filter(roles::name.eq(name)).into_boxed();
    if let Some(id) = excluding {
        query = query.filter(roles::id.ne(id));
    }
    diesel::select(exists(query)).get_result(conn).await
}

/// Replace every grant of `role_id` with `permission_ids`.
///
/// `permission_ids` must be free of duplicates.
async fn replace_grants(
    conn: &mut AsyncPgConnection,
    role_id: i32,
    permission_ids: &[i32],
) -> Result<(), TxError<RoleRepositoryError>> {
    diesel::delete(role_permissions::table.filter(role_permissions::role_id.eq(role_id)))
        .execute(conn)
        .await?;
    if permission_ids.is_empty() {
        return Ok(());
    }

    let known: Vec<i32> = permissions::table
        .filter(permissions::id.eq_any(permission_ids.to_vec()))
        .select(permissions::id)
        .load(conn)
        .await?;
    if let Some(missing) = permission_ids.iter().find(|id| !known.contains(id)) {
        return Err(TxError::Domain(RoleRepositoryError::unknown_permission(
            *missing,
        )));
    }

    let rows: Vec<RolePermissionRow> = permission_ids
        .iter()
        .map(|&permission_id| RolePermissionRow {
            role_id,
            permission_id,
        })
        .collect();
    diesel::insert_into(role_permissions::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<RoleListing>, u64), RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (rows, permission_counts, user_counts, total) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let rows: Vec<RoleRow> = roles::table
                        .select(RoleRow::as_select())
                        .order(roles::id.asc())
                        .limit(page_limit(page))
                        .offset(page_offset(page))
                        .load(conn)
                        .await?;
                    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
                    let permission_counts: Vec<(i32, i64)> = role_permissions::table
                        .filter(role_permissions::role_id.eq_any(ids.clone()))
                        .group_by(role_permissions::role_id)
                        .select((role_permissions::role_id, count_star()))
                        .load(conn)
                        .await?;
                    let user_counts: Vec<(i32, i64)> = users::table
                        .filter(users::role_id.eq_any(ids))
                        .group_by(users::role_id)
                        .select((users::role_id, count_star()))
                        .load(conn)
                        .await?;
                    let total: i64 = roles::table.count().get_result(conn).await?;
                    Ok((rows, permission_counts, user_counts, total))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("list roles"))?;

        let permission_counts: HashMap<i32, i64> = permission_counts.into_iter().collect();
        let user_counts: HashMap<i32, i64> = user_counts.into_iter().collect();
        let items = rows
            .into_iter()
            .map(|row| RoleListing {
                permission_count: permission_counts.get(&row.id).copied().unwrap_or(0),
                user_count: user_counts.get(&row.id).copied().unwrap_or(0),
                role: RoleSummary::from(row),
            })
            .collect();
        Ok((items, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_detail(&self, id: i32) -> Result<Option<RoleDetail>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move { load_detail(conn, id).await }.scope_boxed()
            })
            .await
            .map_err(map_diesel_error("find role"))?;

        found.map(to_detail).transpose()
    }

    async fn create(&self, role: &NewRole) -> Result<RoleDetail, RoleRepositoryError> {
        let name = role.name.as_str();
        let permission_ids = role.permission_ids.as_slice();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, TxError<RoleRepositoryError>, _>(|conn| {
                async move {
                    if name_taken(conn, name, None).await? {
                        return Err(TxError::Domain(RoleRepositoryError::duplicate_name(name)));
                    }
                    let created: RoleRow = diesel::insert_into(roles::table)
                        .values(&NewRoleRow { name })
                        .returning(RoleRow::as_returning())
                        .get_result(conn)
                        .await?;
                    replace_grants(conn, created.id, permission_ids).await?;
                    Ok(detail_of(conn, created).await?)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error("create role", Some(name)))?;

        to_detail(rows)
    }

    async fn update(
        &self,
        id: i32,
        changes: &RoleChanges,
    ) -> Result<Option<RoleDetail>, RoleRepositoryError> {
        let new_name = changes.name.as_ref().map(|name| name.as_str());
        let permission_ids = changes.permission_ids.as_deref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, TxError<RoleRepositoryError>, _>(|conn| {
                async move {
                    let Some(current) = lock_role(conn, id).await? else {
                        return Ok(None);
                    };
                    if let Some(name) = new_name.filter(|name| *name != current.name) {
                        if name_taken(conn, name, Some(id)).await? {
                            return Err(TxError::Domain(RoleRepositoryError::duplicate_name(
                                name,
                            )));
                        }
                        diesel::update(roles::table.find(id))
                            .set(roles::name.eq(name))
                            .execute(conn)
                            .await?;
                    }
                    if let Some(ids) = permission_ids {
                        replace_grants(conn, id, ids).await?;
                    }
                    Ok(load_detail(conn, id).await?)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error("update role", new_name))?;

        found.map(to_detail).transpose()
    }

    async fn delete(&self, id: i32) -> Result<RoleDeletion, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if lock_role(conn, id).await?.is_none() {
                    return Ok(RoleDeletion::NotFound);
                }
                let user_count = member_count(conn, id).await?;
                if user_count > 0 {
                    return Ok(RoleDeletion::InUse { user_count });
                }
                diesel::delete(roles::table.find(id)).execute(conn).await?;
                Ok(RoleDeletion::Deleted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error("delete role"))
    }

    async fn replace_permissions(
        &self,
        id: i32,
        permission_ids: &[i32],
    ) -> Result<Option<RoleDetail>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, TxError<RoleRepositoryError>, _>(|conn| {
                async move {
                    let Some(role) = lock_role(conn, id).await? else {
                        return Ok(None);
                    };
                    replace_grants(conn, id, permission_ids).await?;
                    Ok(Some(detail_of(conn, role).await?))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error("replace role permissions", None))?;

        found.map(to_detail).transpose()
    }

    async fn list_permissions(
        &self,
        id: i32,
    ) -> Result<Option<Vec<Permission>>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    if !role_exists(conn, id).await? {
                        return Ok(None);
                    }
                    Ok(Some(granted_permissions(conn, id).await?))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("list role permissions"))?;

        rows.map(to_permissions).transpose()
    }

    async fn list_users(&self, id: i32) -> Result<Option<Vec<RoleMember>>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    if !role_exists(conn, id).await? {
                        return Ok(None);
                    }
                    let rows: Vec<UserRow> = users::table
                        .filter(users::role_id.eq(id))
                        .select(UserRow::as_select())
                        .order(users::id.asc())
                        .load(conn)
                        .await?;
                    Ok(Some(rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("list role users"))?;

        Ok(rows.map(|rows| rows.into_iter().map(RoleMember::from).collect()))
    }
}
