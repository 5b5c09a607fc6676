use log::debug;
use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::{MAX_PROGRESS, MIN_PROGRESS, TARGET_DATE_WINDOW_DAYS};
use crate::errors::{Result, ValidationError};
use crate::goals::goals_model::{
    Category, Goal, GoalFilters, GoalInput, GoalListing, GoalMutation, GoalProgressEntry,
    GoalStatus, NewGoal,
};
use crate::goals::goals_traits::{
    GoalProgressLogRepositoryTrait, GoalRepositoryTrait, GoalServiceTrait,
};
use crate::milestones::MilestoneEvaluatorTrait;
use crate::utils::time_utils;
use chrono::{Duration, NaiveDate};

/// The progress engine: validates and persists goal mutations, then hands
/// the owner to the milestone evaluator. The evaluator call is an explicit
/// dependency here rather than an implicit save hook so the cascade stays
/// visible and testable in isolation.
pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    progress_log_repo: Arc<dyn GoalProgressLogRepositoryTrait>,
    evaluator: Arc<dyn MilestoneEvaluatorTrait>,
}

impl GoalService {
    pub fn new(
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        progress_log_repo: Arc<dyn GoalProgressLogRepositoryTrait>,
        evaluator: Arc<dyn MilestoneEvaluatorTrait>,
    ) -> Self {
        GoalService {
            goal_repo,
            progress_log_repo,
            evaluator,
        }
    }

    /// Clamps a raw progress value into the valid percentage range.
    /// Out-of-range input is never an error.
    fn clamp_progress(value: i64) -> i32 {
        value.clamp(MIN_PROGRESS as i64, MAX_PROGRESS as i64) as i32
    }

    /// Accepts a target date only when it parses and lies within
    /// [today, today + window]; anything else is dropped to `None`.
    fn accept_target_date(raw: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
        let date = NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()?;
        let window_end = today + Duration::days(TARGET_DATE_WINDOW_DAYS);
        if date < today || date > window_end {
            return None;
        }
        Some(date)
    }

    fn validate(input: GoalInput, today: NaiveDate) -> Result<NewGoal> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }

        let category_raw = input.category.trim();
        if category_raw.is_empty() {
            return Err(ValidationError::MissingField("category".to_string()).into());
        }
        let category = Category::parse(category_raw)
            .ok_or_else(|| ValidationError::UnknownCategory(category_raw.to_string()))?;

        let target_date = Self::accept_target_date(input.target_date.as_deref(), today);

        Ok(NewGoal {
            id: None,
            user_id: input.user_id,
            title: title.to_string(),
            description: input.description,
            category,
            target_date,
        })
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn create_goal(&self, input: GoalInput) -> Result<GoalMutation> {
        let new_goal = Self::validate(input, time_utils::today_utc())?;
        debug!(
            "Creating goal '{}' for user {} in category {}",
            new_goal.title, new_goal.user_id, new_goal.category
        );

        let goal = self.goal_repo.insert(new_goal).await?;

        // Creation changes the total/category aggregates, so it can unlock
        // milestones just like a progress mutation.
        let newly_unlocked = self.evaluator.evaluate(&goal.user_id).await?;

        Ok(GoalMutation {
            goal,
            newly_unlocked,
        })
    }

    async fn set_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        new_value: i64,
    ) -> Result<GoalMutation> {
        let progress = Self::clamp_progress(new_value);
        let goal = self.goal_repo.get_owned(user_id, goal_id)?;

        let status = GoalStatus::from_progress(progress);
        debug!(
            "Updating goal {} progress {} -> {} ({})",
            goal.id, goal.progress, progress, status
        );

        let updated = self
            .goal_repo
            .save_progress(&goal.id, progress, status)
            .await?;

        self.progress_log_repo
            .append(&updated.id, progress, time_utils::now_utc())
            .await?;

        let newly_unlocked = self.evaluator.evaluate(user_id).await?;

        Ok(GoalMutation {
            goal: updated,
            newly_unlocked,
        })
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        let goal = self.goal_repo.get_owned(user_id, goal_id)?;
        self.goal_repo.delete(&goal.id).await?;
        Ok(())
    }

    async fn delete_goal_admin(&self, goal_id: &str) -> Result<()> {
        let goal = self.goal_repo.get_any(goal_id)?;
        debug!("Admin override: deleting goal {} of user {}", goal.id, goal.user_id);
        self.goal_repo.delete(&goal.id).await?;
        Ok(())
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.goal_repo.get_owned(user_id, goal_id)
    }

    fn list_goals(&self, user_id: &str, filters: &GoalFilters) -> Result<GoalListing> {
        let goals = self.goal_repo.list_filtered(user_id, filters)?;

        // Distinct categories of the filtered set, not the full catalog.
        let categories: BTreeSet<&'static str> =
            goals.iter().map(|g| g.category.as_str()).collect();

        Ok(GoalListing {
            categories: categories.into_iter().map(str::to_string).collect(),
            goals,
        })
    }

    fn progress_history(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalProgressEntry>> {
        let goal = self.goal_repo.get_owned(user_id, goal_id)?;
        self.progress_log_repo.load_for_goal(&goal.id)
    }
}
