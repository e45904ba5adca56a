//! User HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! GET    /api/v1/users/{id}/ranking
//! GET    /api/v1/users/{id}/points-history?limit=
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DEFAULT_HISTORY_LIMIT, MonthlyPoints, NewUser, UserChanges, UserProfile, UserRanking,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::DeletionResponse;
use crate::inbound::http::roles::RoleSummaryResponse;
use crate::inbound::http::schemas::{ErrorSchema, PageMetaSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, LimitQuery, PageQuery, deserialize_some, parse_email, parse_id, parse_slack_id,
};

const ID: FieldName = FieldName::new("id");
const EMAIL: FieldName = FieldName::new("email");
const NOT_YET_CALCULATED: &str = "Ranking not yet calculated for this month";

/// Public view of a user. Password hashes are never serialised.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "U024BE7LH")]
    pub slack_id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = 120)]
    pub points: i32,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    pub role: RoleSummaryResponse,
}

impl From<UserProfile> for UserResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id,
            slack_id: value.slack_id,
            name: value.name,
            email: value.email,
            points: value.points,
            created_at: value.created_at,
            role: value.role.into(),
        }
    }
}

/// Page of users.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPage {
    pub data: Vec<UserResponse>,
    #[schema(value_type = PageMetaSchema)]
    pub meta: pagination::PageMeta,
}

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "U024BE7LH")]
    pub slack_id: String,
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Plaintext; hashed with Argon2id before storage.
    pub password: Option<String>,
    #[schema(example = 2)]
    pub role_id: i32,
}

/// Request body for `PUT /api/v1/users/{id}`.
///
/// Absent fields are left unchanged; `name: null` clears the display name.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i32>,
    pub points: Option<i32>,
}

/// Current-month ranking.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub user_id: i32,
    #[schema(example = 3)]
    pub rank: i32,
    pub points: i32,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 10)]
    pub month: i32,
}

/// Returned when the monthly aggregation has not produced a row yet.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingRankingResponse {
    pub user_id: i32,
    /// The user's live balance.
    pub points: i32,
    /// Always `null`.
    #[schema(value_type = Option<i32>)]
    pub ranking: Option<()>,
    #[schema(example = "Ranking not yet calculated for this month")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UserRankingResponse {
    Ranked(RankingResponse),
    Pending(PendingRankingResponse),
}

impl From<UserRanking> for UserRankingResponse {
    fn from(value: UserRanking) -> Self {
        match value {
            UserRanking::Ranked(ranking) => Self::Ranked(RankingResponse {
                user_id: ranking.user_id,
                rank: ranking.rank,
                points: ranking.points,
                year: ranking.period.year,
                month: ranking.period.month,
            }),
            UserRanking::NotYetCalculated { user_id, points } => {
                Self::Pending(PendingRankingResponse {
                    user_id,
                    points,
                    ranking: None,
                    message: NOT_YET_CALCULATED.to_owned(),
                })
            }
        }
    }
}

/// One monthly points snapshot.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointsHistoryItem {
    pub user_id: i32,
    pub year: i32,
    pub month: i32,
    pub points: i32,
}

impl From<MonthlyPoints> for PointsHistoryItem {
    fn from(value: MonthlyPoints) -> Self {
        Self {
            user_id: value.user_id,
            year: value.period.year,
            month: value.period.month,
            points: value.points,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users page", body = UserPage),
        (status = 400, description = "Invalid page or limit", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserPage>> {
    let page = query.into_inner().into_page_request()?;
    let (data, meta) = state
        .users_query
        .list_users(page)
        .await?
        .map(UserResponse::from)
        .into_parts();
    Ok(web::Json(UserPage { data, meta }))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_id(&path, ID)?;
    let user = state.users_query.get_user(id).await?;
    Ok(web::Json(user.into()))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid body or unknown role", body = ErrorSchema),
        (status = 409, description = "User with this email or Slack ID already exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest {
        slack_id,
        name,
        email,
        password,
        role_id,
    } = payload.into_inner();
    let user = NewUser {
        slack_id: parse_slack_id(slack_id, FieldName::new("slackId"))?,
        name,
        email: parse_email(email, EMAIL)?,
        password,
        role_id,
    };
    let created = state.users.create_user(user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid id or body", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Email is already in use", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_id(&path, ID)?;
    let UpdateUserRequest {
        name,
        email,
        password,
        role_id,
        points,
    } = payload.into_inner();
    let changes = UserChanges {
        name,
        email: email.map(|raw| parse_email(raw, EMAIL)).transpose()?,
        password,
        role_id,
        points,
    };
    let updated = state.users.update_user(id, changes).await?;
    Ok(web::Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = DeletionResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletionResponse>> {
    let id = parse_id(&path, ID)?;
    state.users.delete_user(id).await?;
    Ok(web::Json(DeletionResponse::new("User deleted successfully")))
}

/// Ranking for the current UTC calendar month.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/ranking",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Ranking, or a placeholder when not yet calculated", body = UserRankingResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserRanking"
)]
#[get("/users/{id}/ranking")]
pub async fn user_ranking(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserRankingResponse>> {
    let id = parse_id(&path, ID)?;
    let ranking = state.users_query.current_ranking(id).await?;
    Ok(web::Json(ranking.into()))
}

/// Monthly snapshots, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/points-history",
    params(("id" = i32, Path, description = "User id"), LimitQuery),
    responses(
        (status = 200, description = "Points history", body = [PointsHistoryItem]),
        (status = 400, description = "Invalid id or limit", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserPointsHistory"
)]
#[get("/users/{id}/points-history")]
pub async fn points_history(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<PointsHistoryItem>>> {
    let id = parse_id(&path, ID)?;
    let limit = query.into_inner().parse_or(DEFAULT_HISTORY_LIMIT)?;
    let history = state.users_query.points_history(id, limit).await?;
    Ok(web::Json(history.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
