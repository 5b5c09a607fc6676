use crate::errors::Result;
use crate::reports::reports_model::{CategoryCount, CompletionCounts, GoalTimeline, StatusCount};

/// Trait for the read-only reporting queries.
pub trait ReportsServiceTrait: Send + Sync {
    /// Cumulative goal count by creation date.
    fn timeline(&self, user_id: &str) -> Result<GoalTimeline>;

    /// Count per status, fixed status order, zero counts included.
    fn status_distribution(&self, user_id: &str) -> Result<Vec<StatusCount>>;

    /// Count per category, label ascending, only categories the user has
    /// goals in.
    fn category_distribution(&self, user_id: &str) -> Result<Vec<CategoryCount>>;

    fn completion_counts(&self, user_id: &str) -> Result<CompletionCounts>;
}
