use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::goals::goals_model::{
    Goal, GoalFilters, GoalInput, GoalListing, GoalMutation, GoalProgressEntry, GoalStatus,
    NewGoal,
};

/// Trait for goal repository operations.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    /// All goals owned by the user, created_at descending, id ascending on
    /// ties.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>>;

    /// Filtered listing, same ordering as [`Self::list_by_user`]. Set
    /// filter fields AND together; unset fields do not constrain.
    fn list_filtered(&self, user_id: &str, filters: &GoalFilters) -> Result<Vec<Goal>>;

    /// The goal with this id if it is owned by the user. A goal that is
    /// absent and a goal owned by someone else both come back as the same
    /// not-found error.
    fn get_owned(&self, user_id: &str, goal_id: &str) -> Result<Goal>;

    /// Ownership-blind lookup for the administrative override path.
    fn get_any(&self, goal_id: &str) -> Result<Goal>;

    fn count_by_user(&self, user_id: &str) -> Result<i64>;

    fn count_completed(&self, user_id: &str) -> Result<i64>;

    async fn insert(&self, new_goal: NewGoal) -> Result<Goal>;

    /// Persists a progress mutation together with its derived status.
    async fn save_progress(
        &self,
        goal_id: &str,
        progress: i32,
        status: GoalStatus,
    ) -> Result<Goal>;

    /// Deletes the goal and its progress-log entries in one unit of work.
    /// Returns the number of goal rows removed.
    async fn delete(&self, goal_id: &str) -> Result<usize>;
}

/// Trait for the append-only progress history.
#[async_trait]
pub trait GoalProgressLogRepositoryTrait: Send + Sync {
    async fn append(
        &self,
        goal_id: &str,
        progress: i32,
        recorded_at: NaiveDateTime,
    ) -> Result<GoalProgressEntry>;

    /// Entries for one goal, oldest first.
    fn load_for_goal(&self, goal_id: &str) -> Result<Vec<GoalProgressEntry>>;
}

/// Trait for goal service operations (the progress engine).
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// Validates and creates a goal, then evaluates milestones for the
    /// owner. Unparseable or out-of-window target dates are stored as
    /// absent; a missing title or unknown category aborts with a
    /// validation error before anything is written.
    async fn create_goal(&self, input: GoalInput) -> Result<GoalMutation>;

    /// Clamps `new_value` into 0..=100, recomputes status, persists,
    /// appends a history entry, then evaluates milestones for the owner.
    async fn set_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        new_value: i64,
    ) -> Result<GoalMutation>;

    /// Deletes an owned goal and its history. Already-granted unlocks are
    /// never retracted.
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;

    /// Privileged override: deletes any user's goal regardless of
    /// ownership.
    async fn delete_goal_admin(&self, goal_id: &str) -> Result<()>;

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;

    /// Filtered listing plus the distinct categories of the filtered set.
    fn list_goals(&self, user_id: &str, filters: &GoalFilters) -> Result<GoalListing>;

    fn progress_history(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalProgressEntry>>;
}
