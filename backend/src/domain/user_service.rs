//! User domain service.
//!
//! This service owns the user-slice rules that do not belong in storage:
//! - passwords are hashed before they reach the repository, and only once the
//!   email and Slack id are known to be free;
//! - the ranking period comes from the injected clock, in UTC;
//! - a missing ranking snapshot yields a sentinel instead of an error.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, UserCommand, UserQuery, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Error, MonthlyPoints, NewUser, RankingPeriod, UserChanges, UserDraft, UserPatch, UserProfile,
    UserRanking,
};

const NOT_FOUND: &str = "User not found";
const DUPLICATE_IDENTITY: &str = "User with this email or Slack ID already exists";
const EMAIL_IN_USE: &str = "Email is already in use";

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { .. } => Error::storage_unavailable(),
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateIdentity => Error::conflict(DUPLICATE_IDENTITY),
        UserRepositoryError::EmailInUse { .. } => Error::conflict(EMAIL_IN_USE),
        UserRepositoryError::UnknownRole { id } => {
            Error::invalid_field(
                format!("Role {id} does not exist"),
                "roleId",
                "unknown_role",
                id,
            )
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

/// User service implementing [`UserCommand`] and [`UserQuery`].
#[derive(Clone)]
pub struct UserService<R, H> {
    user_repo: Arc<R>,
    password_hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> UserService<R, H> {
    pub fn new(user_repo: Arc<R>, password_hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repo,
            password_hasher,
            clock,
        }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn hash_optional(&self, password: Option<&str>) -> Result<Option<String>, Error> {
        match password {
            Some(plaintext) => self
                .password_hasher
                .hash(plaintext)
                .await
                .map(Some)
                .map_err(map_hash_error),
            None => Ok(None),
        }
    }

    async fn require_user(&self, id: i32) -> Result<UserProfile, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[async_trait]
impl<R, H> UserCommand for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, Error> {
        // The repository re-checks inside the insert transaction.
        if user.password.is_some() {
            let taken = self
                .user_repo
                .identity_taken(user.slack_id.as_str(), user.email.as_str())
                .await
                .map_err(map_repository_error)?;
            if taken {
                return Err(Error::conflict(DUPLICATE_IDENTITY));
            }
        }
        let password_hash = self.hash_optional(user.password.as_deref()).await?;
        let draft = UserDraft {
            slack_id: user.slack_id.as_str().to_owned(),
            name: user.name,
            email: user.email.into_inner(),
            password_hash,
            role_id: user.role_id,
        };
        self.user_repo
            .create(&draft)
            .await
            .map_err(map_repository_error)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<UserProfile, Error> {
        let password_hash = self.hash_optional(changes.password.as_deref()).await?;
        let patch = UserPatch {
            name: changes.name,
            email: changes.email.map(|email| email.into_inner()),
            password_hash,
            role_id: changes.role_id,
            points: changes.points,
        };
        self.user_repo
            .update(id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete_user(&self, id: i32) -> Result<(), Error> {
        let deleted = self
            .user_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[async_trait]
impl<R, H> UserQuery for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, page: PageRequest) -> Result<Paginated<UserProfile>, Error> {
        let (items, total) = self
            .user_repo
            .list(page)
            .await
            .map_err(map_repository_error)?;
        Ok(Paginated::new(items, page, total))
    }

    async fn get_user(&self, id: i32) -> Result<UserProfile, Error> {
        self.require_user(id).await
    }

    async fn current_ranking(&self, id: i32) -> Result<UserRanking, Error> {
        let user = self.require_user(id).await?;
        let period = RankingPeriod::containing(self.clock.utc());
        let ranking = self
            .user_repo
            .find_ranking(user.id, period)
            .await
            .map_err(map_repository_error)?;
        Ok(ranking.map_or(
            UserRanking::NotYetCalculated {
                user_id: user.id,
                points: user.points,
            },
            UserRanking::Ranked,
        ))
    }

    async fn points_history(&self, id: i32, limit: u32) -> Result<Vec<MonthlyPoints>, Error> {
        if limit == 0 {
            return Err(Error::invalid_request("limit must be a positive integer"));
        }
        let user = self.require_user(id).await?;
        self.user_repo
            .points_history(user.id, limit)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
