//! Database models for the milestone catalog.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use stride_core::errors::{DatabaseError, Error};
use stride_core::goals::Category;
use stride_core::milestones::{Milestone, MilestoneType};

/// Database model for milestones.
#[derive(
    Insertable,
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
#[diesel(table_name = crate::schema::milestones)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDB {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub required_value: i32,
    pub milestone_type: String,
    pub category: Option<String>,
}

impl TryFrom<MilestoneDB> for Milestone {
    type Error = Error;

    fn try_from(db: MilestoneDB) -> Result<Self, Error> {
        let milestone_type = MilestoneType::parse(&db.milestone_type).ok_or_else(|| {
            Error::Database(DatabaseError::Internal(format!(
                "Milestone {} has unknown type '{}'",
                db.id, db.milestone_type
            )))
        })?;
        let category = db
            .category
            .as_deref()
            .map(|raw| {
                Category::parse(raw).ok_or_else(|| {
                    Error::Database(DatabaseError::Internal(format!(
                        "Milestone {} has unknown category '{}'",
                        db.id, raw
                    )))
                })
            })
            .transpose()?;
        Ok(Milestone {
            id: db.id,
            title: db.title,
            description: db.description,
            icon: db.icon,
            required_value: db.required_value,
            milestone_type,
            category,
        })
    }
}

impl From<Milestone> for MilestoneDB {
    fn from(domain: Milestone) -> Self {
        Self {
            id: domain.id,
            title: domain.title,
            description: domain.description,
            icon: domain.icon,
            required_value: domain.required_value,
            milestone_type: domain.milestone_type.as_str().to_string(),
            category: domain.category.map(|c| c.as_str().to_string()),
        }
    }
}
