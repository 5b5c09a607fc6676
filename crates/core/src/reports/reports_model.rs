//! Report read models, shaped for direct JSON serialization.

use serde::{Deserialize, Serialize};

use crate::goals::GoalStatus;

/// Cumulative goal count by creation date, ascending. Labels and values
/// are parallel arrays, ready for a line chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalTimeline {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

/// Goal count for one status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: GoalStatus,
    pub total: i64,
}

/// Goal count for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub total: i64,
}

/// Completed versus still-pending goal counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCounts {
    pub completed: i64,
    pub pending: i64,
}
