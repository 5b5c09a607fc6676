//! Achievement ledger domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::milestones::Milestone;

/// Per-user unlock record for one milestone. Unique on (user, milestone);
/// once `unlocked` is true it never flips back and `unlocked_at` is never
/// rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserMilestoneUnlock {
    pub id: String,
    pub user_id: String,
    pub milestone_id: String,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}

/// An unlock joined with its milestone, as surfaced to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    pub milestone: Milestone,
    pub unlocked_at: NaiveDateTime,
}

/// One row of the full milestone board: every catalog entry with its
/// unlock state for the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneStatus {
    pub milestone: Milestone,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}
