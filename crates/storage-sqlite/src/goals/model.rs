//! Database models for goals and the progress log.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use stride_core::errors::{DatabaseError, Error};
use stride_core::goals::{Category, Goal, GoalProgressEntry, GoalStatus};

/// Database model for goals.
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub progress: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub target_date: Option<NaiveDate>,
}

/// Database model for creating a new goal.
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[serde(rename_all = "camelCase")]
pub struct NewGoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub progress: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub target_date: Option<NaiveDate>,
}

/// Database model for progress-log entries.
#[derive(
    Insertable, Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::goal_progress_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressLogDB {
    pub id: String,
    pub goal_id: String,
    pub progress: i32,
    pub created_at: NaiveDateTime,
}

// Conversion to domain models. Category and status live as their display
// strings in SQLite; a row that fails to decode is a corrupt store, not a
// caller error.

impl TryFrom<GoalDB> for Goal {
    type Error = Error;

    fn try_from(db: GoalDB) -> Result<Self, Error> {
        let category = Category::parse(&db.category).ok_or_else(|| {
            Error::Database(DatabaseError::Internal(format!(
                "Goal {} has unknown category '{}'",
                db.id, db.category
            )))
        })?;
        let status = GoalStatus::parse(&db.status).ok_or_else(|| {
            Error::Database(DatabaseError::Internal(format!(
                "Goal {} has unknown status '{}'",
                db.id, db.status
            )))
        })?;
        Ok(Goal {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            category,
            progress: db.progress,
            status,
            created_at: db.created_at,
            target_date: db.target_date,
        })
    }
}

impl From<GoalProgressLogDB> for GoalProgressEntry {
    fn from(db: GoalProgressLogDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            progress: db.progress,
            created_at: db.created_at,
        }
    }
}
