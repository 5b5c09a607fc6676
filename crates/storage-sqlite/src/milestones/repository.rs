use std::sync::Arc;

use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use stride_core::errors::{Error, Result};
use stride_core::milestones::{Milestone, MilestoneCatalogTrait};

use super::model::MilestoneDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::milestones;

pub struct MilestoneRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MilestoneRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MilestoneRepository { pool, writer }
    }

    /// Administration path: inserts a milestone, or replaces an existing
    /// one with the same id. The evaluation engine itself never writes the
    /// catalog.
    pub async fn upsert(&self, milestone: Milestone) -> Result<Milestone> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Milestone> {
                let mut row = MilestoneDB::from(milestone);
                if row.id.is_empty() {
                    row.id = Uuid::new_v4().to_string();
                }

                let result_db = diesel::insert_into(milestones::table)
                    .values(&row)
                    .on_conflict(milestones::id)
                    .do_update()
                    .set(&row)
                    .returning(MilestoneDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Milestone::try_from(result_db)
            })
            .await
    }
}

impl MilestoneCatalogTrait for MilestoneRepository {
    fn load_all(&self) -> Result<Vec<Milestone>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = milestones::table
            .order(milestones::title.asc())
            .load::<MilestoneDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(Milestone::try_from).collect()
    }

    fn get_by_id(&self, milestone_id: &str) -> Result<Milestone> {
        let mut conn = get_connection(&self.pool)?;
        let row = milestones::table
            .find(milestone_id)
            .first::<MilestoneDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Milestone::try_from)
            .transpose()?
            .ok_or_else(Error::milestone_not_found)
    }
}
