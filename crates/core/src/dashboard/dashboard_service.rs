use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::achievements::AchievementServiceTrait;
use crate::constants::{RECENT_ACHIEVEMENTS_LIMIT, RECENT_GOALS_LIMIT};
use crate::dashboard::dashboard_model::DashboardSummary;
use crate::dashboard::dashboard_traits::DashboardServiceTrait;
use crate::errors::Result;
use crate::goals::{GoalRepositoryTrait, GoalStatus};
use crate::utils::time_utils;

/// Composes counts, completion rate, recent items, and the unlock-day
/// streak into one dashboard read.
pub struct DashboardService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    achievements: Arc<dyn AchievementServiceTrait>,
}

impl DashboardService {
    pub fn new(
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        achievements: Arc<dyn AchievementServiceTrait>,
    ) -> Self {
        DashboardService {
            goal_repo,
            achievements,
        }
    }

    /// Completed-over-total as a percentage, rounded half-up. Zero goals
    /// means zero, not a division error.
    pub(crate) fn completion_rate(completed: i64, total: i64) -> i32 {
        if total <= 0 {
            return 0;
        }
        (completed as f64 / total as f64 * 100.0).round() as i32
    }

    /// Walks backward one day at a time starting at `today`, counting
    /// while each day has at least one unlock. A day without an unlock
    /// (including today itself) ends the streak.
    pub(crate) fn streak(unlock_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = today;
        while unlock_days.contains(&day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }
}

impl DashboardServiceTrait for DashboardService {
    fn summarize(&self, user_id: &str) -> Result<DashboardSummary> {
        let goals = self.goal_repo.list_by_user(user_id)?;

        let total_goals = goals.len() as i64;
        let completed_goals = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count() as i64;
        let in_progress_goals = goals
            .iter()
            .filter(|g| g.status == GoalStatus::InProgress)
            .count() as i64;
        let not_started_goals = total_goals - completed_goals - in_progress_goals;

        // Listing order is already created_at desc.
        let recent_goals = goals
            .iter()
            .take(RECENT_GOALS_LIMIT)
            .cloned()
            .collect();

        let achievements_count = self.achievements.count(user_id)?;
        let recent_achievements = self
            .achievements
            .recent_unlocks(user_id, RECENT_ACHIEVEMENTS_LIMIT)?;

        let unlock_days = self.achievements.unlocked_dates(user_id)?;
        let streak = Self::streak(&unlock_days, time_utils::today_utc());

        Ok(DashboardSummary {
            total_goals,
            completed_goals,
            in_progress_goals,
            not_started_goals,
            completion_rate: Self::completion_rate(completed_goals, total_goals),
            recent_goals,
            achievements_count,
            recent_achievements,
            streak,
        })
    }
}
