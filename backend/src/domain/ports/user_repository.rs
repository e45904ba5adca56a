//! Port for user persistence and ranking snapshot reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{MonthlyPoints, Ranking, RankingPeriod, UserDraft, UserPatch, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError for "user repository" {
        /// The email or Slack id is already registered.
        DuplicateIdentity => "user email or slack id already exists",
        /// Another user already owns the requested email.
        EmailInUse { email: String } => "email already in use: {email}",
        /// The referenced role does not exist.
        UnknownRole { id: i32 } => "role {id} does not exist",
    }
}

/// Port for reading and writing users and their monthly snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// One page of users ordered by id, plus the total row count.
    async fn list(&self, page: PageRequest)
    -> Result<(Vec<UserProfile>, u64), UserRepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Whether any user already holds `slack_id` or `email`.
    async fn identity_taken(&self, slack_id: &str, email: &str)
    -> Result<bool, UserRepositoryError>;

    /// Insert a user after checking email and Slack id with a single OR
    /// query in the same transaction.
    async fn create(&self, user: &UserDraft) -> Result<UserProfile, UserRepositoryError>;

    /// Apply `patch`, re-checking email uniqueness against other rows.
    /// Returns `None` when the user does not exist.
    async fn update(
        &self,
        id: i32,
        patch: &UserPatch,
    ) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Returns `false` when the user does not exist.
    async fn delete(&self, id: i32) -> Result<bool, UserRepositoryError>;

    async fn find_ranking(
        &self,
        user_id: i32,
        period: RankingPeriod,
    ) -> Result<Option<Ranking>, UserRepositoryError>;

    /// Up to `limit` snapshots, newest first.
    async fn points_history(
        &self,
        user_id: i32,
        limit: u32,
    ) -> Result<Vec<MonthlyPoints>, UserRepositoryError>;
}
