//! Milestone catalog domain models.

use serde::{Deserialize, Serialize};

use crate::goals::Category;

/// Which aggregate over a user's goals a milestone condition tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneType {
    /// Count of all goals owned by the user.
    #[serde(rename = "total_goals")]
    TotalGoals,
    /// Count of goals whose status is Completed.
    #[serde(rename = "completed_goals")]
    CompletedGoals,
    /// At least one goal with progress at or above the required value,
    /// optionally narrowed to one category.
    #[serde(rename = "progress")]
    ProgressThreshold,
    /// Count of all goals in the milestone's category, regardless of
    /// progress.
    #[serde(rename = "category")]
    CategoryCount,
}

impl MilestoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::TotalGoals => "total_goals",
            MilestoneType::CompletedGoals => "completed_goals",
            MilestoneType::ProgressThreshold => "progress",
            MilestoneType::CategoryCount => "category",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "total_goals" => Some(MilestoneType::TotalGoals),
            "completed_goals" => Some(MilestoneType::CompletedGoals),
            "progress" => Some(MilestoneType::ProgressThreshold),
            "category" => Some(MilestoneType::CategoryCount),
            _ => None,
        }
    }
}

/// An administered milestone rule. Immutable from the evaluation engine's
/// perspective; administration happens outside the core traits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display glyph name; may be empty.
    pub icon: String,
    pub required_value: i32,
    pub milestone_type: MilestoneType,
    /// Required when `milestone_type` is [`MilestoneType::CategoryCount`];
    /// optional narrowing for [`MilestoneType::ProgressThreshold`].
    pub category: Option<Category>,
}
