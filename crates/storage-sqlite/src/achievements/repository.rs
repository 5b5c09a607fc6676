use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use stride_core::achievements::{AchievementRepositoryTrait, UserMilestoneUnlock};
use stride_core::errors::{DatabaseError, Error, Result};

use super::model::UserMilestoneDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::user_milestones;

pub struct AchievementRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AchievementRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AchievementRepository { pool, writer }
    }
}

#[async_trait]
impl AchievementRepositoryTrait for AchievementRepository {
    async fn ensure(&self, user_id: &str, milestone_id: &str) -> Result<UserMilestoneUnlock> {
        let user_id = user_id.to_string();
        let milestone_id = milestone_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<UserMilestoneUnlock> {
                    // Insert-or-ignore against the unique (user, milestone)
                    // index: racing creations collapse onto one row.
                    let row = UserMilestoneDB {
                        id: Uuid::new_v4().to_string(),
                        user_id: user_id.clone(),
                        milestone_id: milestone_id.clone(),
                        unlocked: false,
                        unlocked_at: None,
                    };
                    diesel::insert_or_ignore_into(user_milestones::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;

                    let result_db = user_milestones::table
                        .filter(user_milestones::user_id.eq(&user_id))
                        .filter(user_milestones::milestone_id.eq(&milestone_id))
                        .first::<UserMilestoneDB>(conn)
                        .map_err(StorageError::from)?;
                    Ok(UserMilestoneUnlock::from(result_db))
                },
            )
            .await
    }

    async fn try_unlock(
        &self,
        user_id: &str,
        milestone_id: &str,
        unlocked_at: NaiveDateTime,
    ) -> Result<bool> {
        let user_id = user_id.to_string();
        let milestone_id = milestone_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                // Compare-and-set: the `unlocked = false` predicate makes a
                // second unlock a no-op instead of a timestamp rewrite.
                let updated = diesel::update(
                    user_milestones::table
                        .filter(user_milestones::user_id.eq(&user_id))
                        .filter(user_milestones::milestone_id.eq(&milestone_id))
                        .filter(user_milestones::unlocked.eq(false)),
                )
                .set((
                    user_milestones::unlocked.eq(true),
                    user_milestones::unlocked_at.eq(Some(unlocked_at)),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;

                match updated {
                    0 => Ok(false),
                    1 => Ok(true),
                    n => Err(Error::Database(DatabaseError::Internal(format!(
                        "Unlock matched {} rows for one (user, milestone) pair",
                        n
                    )))),
                }
            })
            .await
    }

    fn load_unlocked(&self, user_id: &str) -> Result<Vec<UserMilestoneUnlock>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_milestones::table
            .filter(user_milestones::user_id.eq(user_id))
            .filter(user_milestones::unlocked.eq(true))
            .order((
                user_milestones::unlocked_at.desc(),
                user_milestones::milestone_id.asc(),
            ))
            .load::<UserMilestoneDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(UserMilestoneUnlock::from).collect())
    }

    fn load_all_for_user(&self, user_id: &str) -> Result<Vec<UserMilestoneUnlock>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_milestones::table
            .filter(user_milestones::user_id.eq(user_id))
            .order(user_milestones::milestone_id.asc())
            .load::<UserMilestoneDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(UserMilestoneUnlock::from).collect())
    }

    fn count_unlocked(&self, user_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(user_milestones::table
            .filter(user_milestones::user_id.eq(user_id))
            .filter(user_milestones::unlocked.eq(true))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?)
    }
}
