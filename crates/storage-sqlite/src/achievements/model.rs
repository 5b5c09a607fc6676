//! Database models for the achievement ledger.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use stride_core::achievements::UserMilestoneUnlock;

use crate::milestones::model::MilestoneDB;

/// Database model for per-user unlock rows. Unique on
/// (user_id, milestone_id) via the schema's index.
#[derive(
    Insertable,
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(MilestoneDB, foreign_key = milestone_id))]
#[diesel(table_name = crate::schema::user_milestones)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserMilestoneDB {
    pub id: String,
    pub user_id: String,
    pub milestone_id: String,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}

impl From<UserMilestoneDB> for UserMilestoneUnlock {
    fn from(db: UserMilestoneDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            milestone_id: db.milestone_id,
            unlocked: db.unlocked,
            unlocked_at: db.unlocked_at,
        }
    }
}
