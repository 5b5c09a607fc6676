use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::achievements::achievements_model::{MilestoneStatus, UnlockedAchievement};
use crate::achievements::achievements_traits::{
    AchievementRepositoryTrait, AchievementServiceTrait,
};
use crate::errors::Result;
use crate::milestones::{Milestone, MilestoneCatalogTrait};
use crate::utils::time_utils;

/// Queryable record of per-user unlock events.
pub struct AchievementService {
    achievement_repo: Arc<dyn AchievementRepositoryTrait>,
    catalog: Arc<dyn MilestoneCatalogTrait>,
}

impl AchievementService {
    pub fn new(
        achievement_repo: Arc<dyn AchievementRepositoryTrait>,
        catalog: Arc<dyn MilestoneCatalogTrait>,
    ) -> Self {
        AchievementService {
            achievement_repo,
            catalog,
        }
    }

    fn catalog_by_id(&self) -> Result<HashMap<String, Milestone>> {
        Ok(self
            .catalog
            .load_all()?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect())
    }
}

impl AchievementServiceTrait for AchievementService {
    fn recent_unlocks(&self, user_id: &str, limit: usize) -> Result<Vec<UnlockedAchievement>> {
        let milestones = self.catalog_by_id()?;

        // Rows arrive ordered unlocked_at desc, milestone id asc on ties.
        let unlocks = self.achievement_repo.load_unlocked(user_id)?;

        Ok(unlocks
            .into_iter()
            .filter_map(|row| {
                let milestone = milestones.get(&row.milestone_id)?.clone();
                let unlocked_at = row.unlocked_at?;
                Some(UnlockedAchievement {
                    milestone,
                    unlocked_at,
                })
            })
            .take(limit)
            .collect())
    }

    fn count(&self, user_id: &str) -> Result<i64> {
        self.achievement_repo.count_unlocked(user_id)
    }

    fn unlocked_dates(&self, user_id: &str) -> Result<HashSet<NaiveDate>> {
        let unlocks = self.achievement_repo.load_unlocked(user_id)?;
        Ok(unlocks
            .into_iter()
            .filter_map(|row| row.unlocked_at.map(time_utils::date_of))
            .collect())
    }

    fn milestone_board(&self, user_id: &str) -> Result<Vec<MilestoneStatus>> {
        let catalog = self.catalog.load_all()?;
        let unlock_rows: HashMap<String, _> = self
            .achievement_repo
            .load_all_for_user(user_id)?
            .into_iter()
            .map(|row| (row.milestone_id.clone(), row))
            .collect();

        Ok(catalog
            .into_iter()
            .map(|milestone| {
                let row = unlock_rows.get(&milestone.id);
                MilestoneStatus {
                    unlocked: row.map_or(false, |r| r.unlocked),
                    unlocked_at: row.and_then(|r| r.unlocked_at),
                    milestone,
                }
            })
            .collect())
    }
}
