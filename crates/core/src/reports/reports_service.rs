use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::goals::{GoalRepositoryTrait, GoalStatus};
use crate::reports::reports_model::{
    CategoryCount, CompletionCounts, GoalTimeline, StatusCount,
};
use crate::reports::reports_traits::ReportsServiceTrait;

/// Read-only reporting queries over one user's goals.
pub struct ReportsService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl ReportsService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>) -> Self {
        ReportsService { goal_repo }
    }
}

impl ReportsServiceTrait for ReportsService {
    fn timeline(&self, user_id: &str) -> Result<GoalTimeline> {
        let goals = self.goal_repo.list_by_user(user_id)?;

        // Per-day creation counts; BTreeMap keeps dates ascending.
        let mut per_day: BTreeMap<String, i64> = BTreeMap::new();
        for goal in &goals {
            *per_day
                .entry(goal.created_at.date().format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }

        let mut labels = Vec::with_capacity(per_day.len());
        let mut values = Vec::with_capacity(per_day.len());
        let mut running = 0;
        for (day, count) in per_day {
            running += count;
            labels.push(day);
            values.push(running);
        }

        Ok(GoalTimeline { labels, values })
    }

    fn status_distribution(&self, user_id: &str) -> Result<Vec<StatusCount>> {
        let goals = self.goal_repo.list_by_user(user_id)?;

        Ok(GoalStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                total: goals.iter().filter(|g| g.status == status).count() as i64,
            })
            .collect())
    }

    fn category_distribution(&self, user_id: &str) -> Result<Vec<CategoryCount>> {
        let goals = self.goal_repo.list_by_user(user_id)?;

        let mut per_category: BTreeMap<&'static str, i64> = BTreeMap::new();
        for goal in &goals {
            *per_category.entry(goal.category.as_str()).or_insert(0) += 1;
        }

        Ok(per_category
            .into_iter()
            .map(|(category, total)| CategoryCount {
                category: category.to_string(),
                total,
            })
            .collect())
    }

    fn completion_counts(&self, user_id: &str) -> Result<CompletionCounts> {
        let total = self.goal_repo.count_by_user(user_id)?;
        let completed = self.goal_repo.count_completed(user_id)?;
        Ok(CompletionCounts {
            completed,
            pending: total - completed,
        })
    }
}
