use log::debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::achievements::AchievementRepositoryTrait;
use crate::errors::Result;
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus};
use crate::milestones::milestones_model::{Milestone, MilestoneType};
use crate::milestones::milestones_traits::{MilestoneCatalogTrait, MilestoneEvaluatorTrait};
use crate::utils::time_utils;

/// Evaluates the milestone catalog against one user's goal aggregate.
///
/// The scan is O(catalog): the user's goals are loaded once and every
/// predicate runs against the pre-computed aggregate. Unlocking goes
/// through the ledger's conditional compare-and-set, so a satisfied
/// condition evaluated twice (including concurrently) still unlocks at
/// most once and never rewrites `unlocked_at`.
pub struct MilestoneEvaluator {
    catalog: Arc<dyn MilestoneCatalogTrait>,
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    achievement_repo: Arc<dyn AchievementRepositoryTrait>,
}

impl MilestoneEvaluator {
    pub fn new(
        catalog: Arc<dyn MilestoneCatalogTrait>,
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        achievement_repo: Arc<dyn AchievementRepositoryTrait>,
    ) -> Self {
        MilestoneEvaluator {
            catalog,
            goal_repo,
            achievement_repo,
        }
    }

    /// Type-specific qualification predicate over the goal aggregate.
    fn qualifies(milestone: &Milestone, goals: &[Goal]) -> bool {
        match milestone.milestone_type {
            MilestoneType::TotalGoals => goals.len() as i32 >= milestone.required_value,
            MilestoneType::CompletedGoals => {
                let completed = goals
                    .iter()
                    .filter(|g| g.status == GoalStatus::Completed)
                    .count();
                completed as i32 >= milestone.required_value
            }
            MilestoneType::ProgressThreshold => goals.iter().any(|g| {
                g.progress >= milestone.required_value
                    && milestone.category.map_or(true, |c| g.category == c)
            }),
            MilestoneType::CategoryCount => match milestone.category {
                // Counts every goal in the category, started or not.
                Some(category) => {
                    let in_category = goals.iter().filter(|g| g.category == category).count();
                    in_category as i32 >= milestone.required_value
                }
                // A category milestone without a category can never fire.
                None => false,
            },
        }
    }
}

#[async_trait]
impl MilestoneEvaluatorTrait for MilestoneEvaluator {
    async fn evaluate(&self, user_id: &str) -> Result<Vec<Milestone>> {
        let goals = self.goal_repo.list_by_user(user_id)?;
        let catalog = self.catalog.load_all()?;

        let mut newly_unlocked = Vec::new();
        for milestone in catalog {
            // Make sure the (user, milestone) row exists; once created it
            // persists across calls even while still locked.
            let tracked = self.achievement_repo.ensure(user_id, &milestone.id).await?;
            if tracked.unlocked {
                continue;
            }

            if !Self::qualifies(&milestone, &goals) {
                continue;
            }

            // Compare-and-set keyed on (user, milestone): only the call
            // that actually flips the flag reports the unlock.
            let unlocked = self
                .achievement_repo
                .try_unlock(user_id, &milestone.id, time_utils::now_utc())
                .await?;
            if unlocked {
                debug!("User {} unlocked milestone '{}'", user_id, milestone.title);
                newly_unlocked.push(milestone);
            }
        }

        Ok(newly_unlocked)
    }
}
