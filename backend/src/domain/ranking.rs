//! Monthly ranking and points snapshots.
//!
//! Snapshots are produced by an external aggregation job; this service only
//! reads them.

use chrono::{DateTime, Datelike, Utc};

/// Calendar month a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankingPeriod {
    pub year: i32,
    /// One-based month, `1..=12`.
    pub month: i32,
}

impl RankingPeriod {
    /// Period containing `instant`, evaluated in UTC.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use rbac_api::domain::RankingPeriod;
    ///
    /// let instant = Utc
    ///     .with_ymd_and_hms(2026, 1, 31, 23, 59, 59)
    ///     .single()
    ///     .expect("valid timestamp");
    /// assert_eq!(RankingPeriod::containing(instant), RankingPeriod { year: 2026, month: 1 });
    /// ```
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            // month() is always 1..=12.
            month: i32::try_from(instant.month()).unwrap_or(12),
        }
    }
}

/// Stored ranking row for one user and period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub user_id: i32,
    pub rank: i32,
    pub points: i32,
    pub period: RankingPeriod,
}

/// Stored monthly points row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPoints {
    pub user_id: i32,
    pub points: i32,
    pub period: RankingPeriod,
}

/// Ranking lookup result for the current period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRanking {
    Ranked(Ranking),
    /// No snapshot exists yet; carries the user's live balance instead.
    NotYetCalculated { user_id: i32, points: i32 },
}

/// Points history entries returned when no limit is supplied.
pub const DEFAULT_HISTORY_LIMIT: u32 = 12;
