//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Users are always read joined with their role. Uniqueness and role
//! existence checks run in the same transaction as the write they guard; the
//! database constraints remain the backstop for races between transactions.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{MonthlyPoints, Ranking, RankingPeriod, UserDraft, UserPatch, UserProfile};

use super::diesel_error_mapping::{
    TxError, is_foreign_key_violation, is_unique_violation, pool_error, storage_error,
};
use super::models::{MonthlyPointsRow, NewUserRow, RankingRow, RoleRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{monthly_points, rankings, roles, users};
use super::{page_limit, page_offset};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    pool_error(error)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> UserRepositoryError {
    move |error| storage_error(operation, error)
}

async fn load_profile(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> QueryResult<Option<(UserRow, RoleRow)>> {
    users::table
        .inner_join(roles::table)
        .filter(users::id.eq(id))
        .select((UserRow::as_select(), RoleRow::as_select()))
        .first(conn)
        .await
        .optional()
}

async fn role_exists(conn: &mut AsyncPgConnection, role_id: i32) -> QueryResult<bool> {
    diesel::select(exists(roles::table.find(role_id)))
        .get_result(conn)
        .await
}

async fn identity_in_use(
    conn: &mut AsyncPgConnection,
    slack_id: &str,
    email: &str,
) -> QueryResult<bool> {
    diesel::select(exists(
        users::table.filter(users::email.eq(email).or(users::slack_id.eq(slack_id))),
    ))
    .get_result(conn)
    .await
}

fn to_profile((user, role): (UserRow, RoleRow)) -> UserProfile {
    user.into_profile(role)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<UserProfile>, u64), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (rows, total) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let rows: Vec<(UserRow, RoleRow)> = users::table
                        .inner_join(roles::table)
                        .select((UserRow::as_select(), RoleRow::as_select()))
                        .order(users::id.asc())
                        .limit(page_limit(page))
                        .offset(page_offset(page))
                        .load(conn)
                        .await?;
                    let total: i64 = users::table.count().get_result(conn).await?;
                    Ok((rows, total))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("list users"))?;

        let items = rows.into_iter().map(to_profile).collect();
        Ok((items, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = load_profile(&mut conn, id)
            .await
            .map_err(map_diesel_error("find user"))?;
        Ok(found.map(to_profile))
    }

    async fn identity_taken(
        &self,
        slack_id: &str,
        email: &str,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        identity_in_use(&mut conn, slack_id, email)
            .await
            .map_err(map_diesel_error("check user identity"))
    }

    async fn create(&self, user: &UserDraft) -> Result<UserProfile, UserRepositoryError> {
        let new_row = NewUserRow {
            slack_id: user.slack_id.as_str(),
            name: user.name.as_deref(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_deref(),
            role_id: user.role_id,
        };
        let role_id = user.role_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let created = conn
            .transaction::<_, TxError<UserRepositoryError>, _>(|conn| {
                async move {
                    if identity_in_use(conn, new_row.slack_id, new_row.email).await? {
                        return Err(TxError::Domain(UserRepositoryError::duplicate_identity()));
                    }
                    if !role_exists(conn, role_id).await? {
                        return Err(TxError::Domain(UserRepositoryError::unknown_role(role_id)));
                    }
                    let id: i32 = diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning(users::id)
                        .get_result(conn)
                        .await?;
                    let role: RoleRow = roles::table
                        .find(role_id)
                        .select(RoleRow::as_select())
                        .first(conn)
                        .await?;
                    let user: UserRow = users::table
                        .find(id)
                        .select(UserRow::as_select())
                        .first(conn)
                        .await?;
                    Ok((user, role))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                err.resolve("create user", |error| {
                    if is_unique_violation(error) {
                        Some(UserRepositoryError::duplicate_identity())
                    } else if is_foreign_key_violation(error) {
                        Some(UserRepositoryError::unknown_role(role_id))
                    } else {
                        None
                    }
                })
            })?;

        Ok(to_profile(created))
    }

    async fn update(
        &self,
        id: i32,
        patch: &UserPatch,
    ) -> Result<Option<UserProfile>, UserRepositoryError> {
        let changeset = UserUpdate {
            name: patch.name.as_ref().map(|value| value.as_deref()),
            email: patch.email.as_deref(),
            password_hash: patch.password_hash.as_deref(),
            role_id: patch.role_id,
            points: patch.points,
        };
        let email = patch.email.as_deref();
        let role_id = patch.role_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, TxError<UserRepositoryError>, _>(|conn| {
                async move {
                    let locked: Option<i32> = users::table
                        .find(id)
                        .select(users::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }
                    if let Some(email) = email {
                        let taken: bool = diesel::select(exists(
                            users::table
                                .filter(users::email.eq(email))
                                .filter(users::id.ne(id)),
                        ))
                        .get_result(conn)
                        .await?;
                        if taken {
                            return Err(TxError::Domain(UserRepositoryError::email_in_use(email)));
                        }
                    }
                    if let Some(role_id) = role_id {
                        if !role_exists(conn, role_id).await? {
                            return Err(TxError::Domain(UserRepositoryError::unknown_role(
                                role_id,
                            )));
                        }
                    }
                    if !changeset.is_empty() {
                        diesel::update(users::table.find(id))
                            .set(&changeset)
                            .execute(conn)
                            .await?;
                    }
                    Ok(load_profile(conn, id).await?)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                err.resolve("update user", |error| match (email, role_id) {
                    (Some(email), _) if is_unique_violation(error) => {
                        Some(UserRepositoryError::email_in_use(email))
                    }
                    (_, Some(role_id)) if is_foreign_key_violation(error) => {
                        Some(UserRepositoryError::unknown_role(role_id))
                    }
                    _ => None,
                })
            })?;

        Ok(found.map(to_profile))
    }

    async fn delete(&self, id: i32) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("delete user"))?;
        Ok(affected > 0)
    }

    async fn find_ranking(
        &self,
        user_id: i32,
        period: RankingPeriod,
    ) -> Result<Option<Ranking>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RankingRow> = rankings::table
            .filter(rankings::user_id.eq(user_id))
            .filter(rankings::year.eq(period.year))
            .filter(rankings::month.eq(period.month))
            .select(RankingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find ranking"))?;
        Ok(row.map(Ranking::from))
    }

    async fn points_history(
        &self,
        user_id: i32,
        limit: u32,
    ) -> Result<Vec<MonthlyPoints>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MonthlyPointsRow> = monthly_points::table
            .filter(monthly_points::user_id.eq(user_id))
            .select(MonthlyPointsRow::as_select())
            .order((monthly_points::year.desc(), monthly_points::month.desc()))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("load points history"))?;
        Ok(rows.into_iter().map(MonthlyPoints::from).collect())
    }
}
