use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::achievements::achievements_model::{
    MilestoneStatus, UnlockedAchievement, UserMilestoneUnlock,
};
use crate::errors::Result;

/// Trait for the unlock store backing the achievement ledger.
///
/// The (user, milestone) pair is unique; `ensure` and `try_unlock`
/// together are the storage-level guard against duplicate unlocks, so the
/// evaluator never does an unguarded read-then-write.
#[async_trait]
pub trait AchievementRepositoryTrait: Send + Sync {
    /// Returns the unlock row for (user, milestone), creating a locked one
    /// if none exists yet. Racing creations collapse onto the same row.
    async fn ensure(&self, user_id: &str, milestone_id: &str) -> Result<UserMilestoneUnlock>;

    /// Conditionally flips the row to unlocked and stamps `unlocked_at`,
    /// only if it is still locked. Returns whether THIS call performed the
    /// transition. Never overwrites an existing timestamp.
    async fn try_unlock(
        &self,
        user_id: &str,
        milestone_id: &str,
        unlocked_at: NaiveDateTime,
    ) -> Result<bool>;

    /// Unlocked rows for the user, unlocked_at descending, milestone id
    /// ascending on ties.
    fn load_unlocked(&self, user_id: &str) -> Result<Vec<UserMilestoneUnlock>>;

    /// Every row for the user, locked or not.
    fn load_all_for_user(&self, user_id: &str) -> Result<Vec<UserMilestoneUnlock>>;

    fn count_unlocked(&self, user_id: &str) -> Result<i64>;
}

/// Trait for the queryable achievement ledger.
pub trait AchievementServiceTrait: Send + Sync {
    /// Up to `limit` unlocks, most recent first; ties broken by milestone
    /// id ascending for determinism.
    fn recent_unlocks(&self, user_id: &str, limit: usize) -> Result<Vec<UnlockedAchievement>>;

    fn count(&self, user_id: &str) -> Result<i64>;

    /// The calendar dates on which the user unlocked at least one
    /// milestone. Feeds the dashboard streak.
    fn unlocked_dates(&self, user_id: &str) -> Result<HashSet<NaiveDate>>;

    /// The full catalog with per-user unlock flags, catalog order.
    fn milestone_board(&self, user_id: &str) -> Result<Vec<MilestoneStatus>>;
}
