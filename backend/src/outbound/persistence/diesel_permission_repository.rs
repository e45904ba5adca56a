//! PostgreSQL-backed `PermissionRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{PermissionRepository, PermissionRepositoryError};
use crate::domain::{NewPermission, Permission, PermissionChanges, PermissionListing, RoleSummary};

use super::diesel_error_mapping::{TxError, is_unique_violation, pool_error, storage_error};
use super::models::{NewPermissionRow, PermissionRow, PermissionUpdate, RoleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{permissions, role_permissions, roles};
use super::{page_limit, page_offset};

/// Diesel-backed implementation of the `PermissionRepository` port.
#[derive(Clone)]
pub struct DieselPermissionRepository {
    pool: DbPool,
}

impl DieselPermissionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PermissionRepositoryError {
    pool_error(error)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> PermissionRepositoryError {
    move |error| storage_error(operation, error)
}

fn to_permission(row: PermissionRow) -> Result<Permission, PermissionRepositoryError> {
    Permission::try_from(row).map_err(|err| PermissionRepositoryError::query(err.to_string()))
}

fn to_listing(
    row: PermissionRow,
    role_count: i64,
) -> Result<PermissionListing, PermissionRepositoryError> {
    Ok(PermissionListing {
        permission: to_permission(row)?,
        role_count,
    })
}

async fn count_roles(
    conn: &mut diesel_async::AsyncPgConnection,
    permission_id: i32,
) -> QueryResult<i64> {
    role_permissions::table
        .filter(role_permissions::permission_id.eq(permission_id))
        .count()
        .get_result(conn)
        .await
}

#[async_trait]
impl PermissionRepository for DieselPermissionRepository {
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<PermissionListing>, u64), PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Page, total and counts read in one transaction so they agree.
        let (rows, counts, total) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let rows: Vec<PermissionRow> = permissions::table
                        .select(PermissionRow::as_select())
                        .order(permissions::id.asc())
                        .limit(page_limit(page))
                        .offset(page_offset(page))
                        .load(conn)
                        .await?;
                    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
                    let counts: Vec<(i32, i64)> = role_permissions::table
                        .filter(role_permissions::permission_id.eq_any(ids))
                        .group_by(role_permissions::permission_id)
                        .select((role_permissions::permission_id, count_star()))
                        .load(conn)
                        .await?;
                    let total: i64 = permissions::table.count().get_result(conn).await?;
                    Ok((rows, counts, total))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("list permissions"))?;

        let counts: HashMap<i32, i64> = counts.into_iter().collect();
        let items = rows
            .into_iter()
            .map(|row| {
                let role_count = counts.get(&row.id).copied().unwrap_or(0);
                to_listing(row, role_count)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<PermissionListing>, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(row) = permissions::table
                        .find(id)
                        .select(PermissionRow::as_select())
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let role_count = count_roles(conn, id).await?;
                    Ok(Some((row, role_count)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("find permission"))?;

        found
            .map(|(row, role_count)| to_listing(row, role_count))
            .transpose()
    }

    async fn create(
        &self,
        permission: &NewPermission,
    ) -> Result<PermissionListing, PermissionRepositoryError> {
        let name = permission.name.as_str();
        let new_row = NewPermissionRow {
            name,
            description: permission.description.as_deref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction::<_, TxError<PermissionRepositoryError>, _>(|conn| {
                async move {
                    let taken: bool = diesel::select(exists(
                        permissions::table.filter(permissions::name.eq(name)),
                    ))
                    .get_result(conn)
                    .await?;
                    if taken {
                        return Err(TxError::Domain(PermissionRepositoryError::duplicate_name(
                            name,
                        )));
                    }
                    let row = diesel::insert_into(permissions::table)
                        .values(&new_row)
                        .returning(PermissionRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                // A concurrent insert can still win the race past the check.
                err.resolve("create permission", |error| {
                    is_unique_violation(error)
                        .then(|| PermissionRepositoryError::duplicate_name(name))
                })
            })?;

        to_listing(row, 0)
    }

    async fn update(
        &self,
        id: i32,
        changes: &PermissionChanges,
    ) -> Result<Option<PermissionListing>, PermissionRepositoryError> {
        let update = PermissionUpdate {
            description: changes.description.as_ref().map(|value| value.as_deref()),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(current) = permissions::table
                        .find(id)
                        .select(PermissionRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let row = if update.description.is_some() {
                        diesel::update(permissions::table.find(id))
                            .set(&update)
                            .returning(PermissionRow::as_returning())
                            .get_result(conn)
                            .await?
                    } else {
                        current
                    };
                    let role_count = count_roles(conn, id).await?;
                    Ok(Some((row, role_count)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("update permission"))?;

        found
            .map(|(row, role_count)| to_listing(row, role_count))
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(permissions::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("delete permission"))?;
        Ok(affected > 0)
    }

    async fn list_roles(
        &self,
        id: i32,
    ) -> Result<Option<Vec<RoleSummary>>, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let known: bool = diesel::select(exists(permissions::table.find(id)))
                        .get_result(conn)
                        .await?;
                    if !known {
                        return Ok(None);
                    }
                    let rows: Vec<RoleRow> = role_permissions::table
                        .inner_join(roles::table)
                        .filter(role_permissions::permission_id.eq(id))
                        .select(RoleRow::as_select())
                        .order(roles::id.asc())
                        .load(conn)
                        .await?;
                    Ok(Some(rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("list roles for permission"))?;

        Ok(rows.map(|rows| rows.into_iter().map(RoleSummary::from).collect()))
    }
}
