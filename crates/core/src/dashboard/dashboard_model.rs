//! Dashboard read models.

use serde::{Deserialize, Serialize};

use crate::achievements::UnlockedAchievement;
use crate::goals::Goal;

/// Everything the dashboard shows for one user, in a single read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_goals: i64,
    pub completed_goals: i64,
    pub in_progress_goals: i64,
    pub not_started_goals: i64,
    /// Percentage of goals completed, rounded half-up; 0 when the user has
    /// no goals.
    pub completion_rate: i32,
    /// Up to three most recently created goals.
    pub recent_goals: Vec<Goal>,
    pub achievements_count: i64,
    /// Up to three most recent unlocks.
    pub recent_achievements: Vec<UnlockedAchievement>,
    /// Consecutive calendar days ending today with at least one milestone
    /// unlock. Measures achievement streak, not goal activity.
    pub streak: u32,
}
