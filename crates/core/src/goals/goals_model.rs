//! Goals domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{FILTER_ALL, MAX_PROGRESS, MIN_PROGRESS};
use crate::errors::{Result, ValidationError};
use crate::milestones::Milestone;

/// Derived lifecycle state of a goal. Never stored independently of
/// progress; always recomputed through [`GoalStatus::from_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl GoalStatus {
    /// All statuses in their fixed reporting order.
    pub const ALL: [GoalStatus; 3] = [
        GoalStatus::NotStarted,
        GoalStatus::InProgress,
        GoalStatus::Completed,
    ];

    /// Status is a pure function of progress: 0 is not started, 100 is
    /// completed, everything in between is in progress.
    pub fn from_progress(progress: i32) -> Self {
        if progress >= MAX_PROGRESS {
            GoalStatus::Completed
        } else if progress > MIN_PROGRESS {
            GoalStatus::InProgress
        } else {
            GoalStatus::NotStarted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "Not Started",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Not Started" => Some(GoalStatus::NotStarted),
            "In Progress" => Some(GoalStatus::InProgress),
            "Completed" => Some(GoalStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed category set goals are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[serde(rename = "Personal Development")]
    PersonalDevelopment,
    #[serde(rename = "Health & Fitness")]
    HealthFitness,
    #[serde(rename = "Learning")]
    Learning,
    #[serde(rename = "Career")]
    Career,
    #[serde(rename = "Finance")]
    Finance,
    #[serde(rename = "Relationships")]
    Relationships,
    #[serde(rename = "Hobbies")]
    Hobbies,
    #[serde(rename = "Travel")]
    Travel,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::PersonalDevelopment,
        Category::HealthFitness,
        Category::Learning,
        Category::Career,
        Category::Finance,
        Category::Relationships,
        Category::Hobbies,
        Category::Travel,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PersonalDevelopment => "Personal Development",
            Category::HealthFitness => "Health & Fitness",
            Category::Learning => "Learning",
            Category::Career => "Career",
            Category::Finance => "Finance",
            Category::Relationships => "Relationships",
            Category::Hobbies => "Hobbies",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Category::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub progress: i32,
    pub status: GoalStatus,
    pub created_at: NaiveDateTime,
    pub target_date: Option<NaiveDate>,
}

/// Raw creation input as it arrives at the boundary; strings are parsed and
/// validated by the service before anything is written.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// `%Y-%m-%d`; unparseable or out-of-window dates are discarded, never
    /// rejected.
    pub target_date: Option<String>,
}

/// Validated creation model handed to the repository for insert.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub target_date: Option<NaiveDate>,
}

/// Append-only history record, one per progress mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressEntry {
    pub id: String,
    pub goal_id: String,
    pub progress: i32,
    pub created_at: NaiveDateTime,
}

/// Structured listing filter. `None` means no constraint; the string-keyed
/// boundary's "All" sentinel is translated here and never compared in
/// business logic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalFilters {
    /// Case-insensitive substring match over title OR description.
    pub search: Option<String>,
    pub category: Option<Category>,
    pub status: Option<GoalStatus>,
}

impl GoalFilters {
    /// Translates boundary query strings into a structured filter.
    ///
    /// An empty or whitespace-only search collapses to no constraint. A
    /// category or status value outside the fixed sets is rejected rather
    /// than silently matching nothing.
    pub fn from_query(
        search: Option<&str>,
        category: &str,
        status: &str,
    ) -> Result<Self> {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let category = if category == FILTER_ALL {
            None
        } else {
            Some(
                Category::parse(category)
                    .ok_or_else(|| ValidationError::UnknownCategory(category.to_string()))?,
            )
        };

        let status = if status == FILTER_ALL {
            None
        } else {
            Some(GoalStatus::parse(status).ok_or_else(|| {
                ValidationError::InvalidInput(format!("Unknown status '{}'", status))
            })?)
        };

        Ok(GoalFilters {
            search,
            category,
            status,
        })
    }

    /// Whether a goal passes every set constraint (filters AND together).
    pub fn matches(&self, goal: &Goal) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_title = goal.title.to_lowercase().contains(&needle);
            let in_description = goal.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(category) = self.category {
            if goal.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if goal.status != status {
                return false;
            }
        }
        true
    }
}

/// A filtered listing plus the distinct categories present in it.
///
/// The category list is derived from the filtered result set, not the full
/// catalog: filtering first, then distinct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalListing {
    pub goals: Vec<Goal>,
    pub categories: Vec<String>,
}

/// Outcome of a goal mutation: the persisted goal plus any milestones the
/// mutation unlocked. The boundary layer decides how to surface the
/// unlocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalMutation {
    pub goal: Goal,
    pub newly_unlocked: Vec<Milestone>,
}
