use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use stride_core::errors::{Error, Result};
use stride_core::goals::{
    Goal, GoalFilters, GoalProgressEntry, GoalProgressLogRepositoryTrait, GoalRepositoryTrait,
    GoalStatus, NewGoal,
};

use super::model::{GoalDB, GoalProgressLogDB, NewGoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{goal_progress_log, goals};

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }

    /// Loads a user's goals ordered created_at desc, id asc, with the
    /// category/status constraints pushed into SQL. The substring search is
    /// applied on the decoded rows so its case-insensitivity matches the
    /// domain contract exactly, not SQLite's ASCII-only LIKE folding.
    fn load_filtered(&self, user_id: &str, filters: &GoalFilters) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = goals::table
            .filter(goals::user_id.eq(user_id))
            .into_boxed();

        if let Some(category) = filters.category {
            query = query.filter(goals::category.eq(category.as_str()));
        }
        if let Some(status) = filters.status {
            query = query.filter(goals::status.eq(status.as_str()));
        }

        let rows = query
            .order((goals::created_at.desc(), goals::id.asc()))
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;

        let decoded: Result<Vec<Goal>> = rows.into_iter().map(Goal::try_from).collect();
        Ok(decoded?
            .into_iter()
            .filter(|g| filters.matches(g))
            .collect())
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.load_filtered(user_id, &GoalFilters::default())
    }

    fn list_filtered(&self, user_id: &str, filters: &GoalFilters) -> Result<Vec<Goal>> {
        self.load_filtered(user_id, filters)
    }

    fn get_owned(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        let row = goals::table
            .filter(goals::id.eq(goal_id))
            .filter(goals::user_id.eq(user_id))
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Goal::try_from)
            .transpose()?
            .ok_or_else(Error::goal_not_found)
    }

    fn get_any(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        let row = goals::table
            .find(goal_id)
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Goal::try_from)
            .transpose()?
            .ok_or_else(Error::goal_not_found)
    }

    fn count_by_user(&self, user_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn count_completed(&self, user_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::user_id.eq(user_id))
            .filter(goals::status.eq(GoalStatus::Completed.as_str()))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?)
    }

    async fn insert(&self, new_goal: NewGoal) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let row = NewGoalDB {
                    id: new_goal
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id: new_goal.user_id,
                    title: new_goal.title,
                    description: new_goal.description,
                    category: new_goal.category.as_str().to_string(),
                    progress: 0,
                    status: GoalStatus::NotStarted.as_str().to_string(),
                    created_at: Utc::now().naive_utc(),
                    target_date: new_goal.target_date,
                };

                let result_db = diesel::insert_into(goals::table)
                    .values(&row)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Goal::try_from(result_db)
            })
            .await
    }

    async fn save_progress(
        &self,
        goal_id: &str,
        progress: i32,
        status: GoalStatus,
    ) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let updated = diesel::update(goals::table.find(&goal_id))
                    .set((
                        goals::progress.eq(progress),
                        goals::status.eq(status.as_str()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::goal_not_found());
                }

                let result_db = goals::table
                    .find(&goal_id)
                    .first::<GoalDB>(conn)
                    .map_err(StorageError::from)?;
                Goal::try_from(result_db)
            })
            .await
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // History rows go with their goal, in the same transaction.
                diesel::delete(
                    goal_progress_log::table.filter(goal_progress_log::goal_id.eq(&goal_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                Ok(diesel::delete(goals::table.find(&goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

pub struct GoalProgressLogRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalProgressLogRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalProgressLogRepository { pool, writer }
    }
}

#[async_trait]
impl GoalProgressLogRepositoryTrait for GoalProgressLogRepository {
    async fn append(
        &self,
        goal_id: &str,
        progress: i32,
        recorded_at: NaiveDateTime,
    ) -> Result<GoalProgressEntry> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<GoalProgressEntry> {
                    let row = GoalProgressLogDB {
                        id: Uuid::new_v4().to_string(),
                        goal_id,
                        progress,
                        created_at: recorded_at,
                    };

                    let result_db = diesel::insert_into(goal_progress_log::table)
                        .values(&row)
                        .returning(GoalProgressLogDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;
                    Ok(GoalProgressEntry::from(result_db))
                },
            )
            .await
    }

    fn load_for_goal(&self, goal_id: &str) -> Result<Vec<GoalProgressEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goal_progress_log::table
            .filter(goal_progress_log::goal_id.eq(goal_id))
            .order((
                goal_progress_log::created_at.asc(),
                goal_progress_log::id.asc(),
            ))
            .load::<GoalProgressLogDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(GoalProgressEntry::from).collect())
    }
}
