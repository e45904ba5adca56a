//! Driving port for user reads, including ranking snapshots.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, MonthlyPoints, UserProfile, UserRanking};

/// Driving port for user read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn list_users(&self, page: PageRequest) -> Result<Paginated<UserProfile>, Error>;

    async fn get_user(&self, id: i32) -> Result<UserProfile, Error>;

    /// Ranking for the current calendar month.
    ///
    /// Returns [`UserRanking::NotYetCalculated`] rather than failing when
    /// the monthly aggregation has not run yet.
    async fn current_ranking(&self, id: i32) -> Result<UserRanking, Error>;

    /// Up to `limit` monthly snapshots, newest first.
    async fn points_history(&self, id: i32, limit: u32) -> Result<Vec<MonthlyPoints>, Error>;
}
