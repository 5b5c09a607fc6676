//! Unit tests for the goal service (progress engine).

use super::*;
use crate::achievements::{AchievementRepositoryTrait, UserMilestoneUnlock};
use crate::errors::{Error, Result, ValidationError};
use crate::milestones::{
    Milestone, MilestoneCatalogTrait, MilestoneEvaluator, MilestoneEvaluatorTrait, MilestoneType,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockGoalRepository {
    goals: RwLock<Vec<Goal>>,
    seq: AtomicI64,
}

impl MockGoalRepository {
    fn new() -> Self {
        Self {
            goals: RwLock::new(Vec::new()),
            seq: AtomicI64::new(0),
        }
    }

    fn sorted(&self) -> Vec<Goal> {
        let mut goals = self.goals.read().unwrap().clone();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        goals
    }
}

#[async_trait]
impl GoalRepositoryTrait for MockGoalRepository {
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|g| g.user_id == user_id)
            .collect())
    }

    fn list_filtered(&self, user_id: &str, filters: &GoalFilters) -> Result<Vec<Goal>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|g| g.user_id == user_id && filters.matches(g))
            .collect())
    }

    fn get_owned(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.goals
            .read()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id && g.user_id == user_id)
            .cloned()
            .ok_or_else(Error::goal_not_found)
    }

    fn get_any(&self, goal_id: &str) -> Result<Goal> {
        self.goals
            .read()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(Error::goal_not_found)
    }

    fn count_by_user(&self, user_id: &str) -> Result<i64> {
        Ok(self
            .goals
            .read()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id)
            .count() as i64)
    }

    fn count_completed(&self, user_id: &str) -> Result<i64> {
        Ok(self
            .goals
            .read()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id && g.status == GoalStatus::Completed)
            .count() as i64)
    }

    async fn insert(&self, new_goal: NewGoal) -> Result<Goal> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let goal = Goal {
            id: format!("goal-{}", n),
            user_id: new_goal.user_id,
            title: new_goal.title,
            description: new_goal.description,
            category: new_goal.category,
            progress: 0,
            status: GoalStatus::NotStarted,
            created_at: Utc::now().naive_utc() + Duration::seconds(n),
            target_date: new_goal.target_date,
        };
        self.goals.write().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn save_progress(
        &self,
        goal_id: &str,
        progress: i32,
        status: GoalStatus,
    ) -> Result<Goal> {
        let mut goals = self.goals.write().unwrap();
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(Error::goal_not_found)?;
        goal.progress = progress;
        goal.status = status;
        Ok(goal.clone())
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let mut goals = self.goals.write().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        Ok(before - goals.len())
    }
}

struct MockProgressLogRepository {
    entries: RwLock<Vec<GoalProgressEntry>>,
}

impl MockProgressLogRepository {
    fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GoalProgressLogRepositoryTrait for MockProgressLogRepository {
    async fn append(
        &self,
        goal_id: &str,
        progress: i32,
        recorded_at: NaiveDateTime,
    ) -> Result<GoalProgressEntry> {
        let mut entries = self.entries.write().unwrap();
        let entry = GoalProgressEntry {
            id: format!("log-{}", entries.len()),
            goal_id: goal_id.to_string(),
            progress,
            created_at: recorded_at,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    fn load_for_goal(&self, goal_id: &str) -> Result<Vec<GoalProgressEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.goal_id == goal_id)
            .cloned()
            .collect())
    }
}

/// Evaluator stub that only records how many times it ran.
struct NoopEvaluator {
    calls: AtomicI64,
}

impl NoopEvaluator {
    fn new() -> Self {
        Self {
            calls: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl MilestoneEvaluatorTrait for NoopEvaluator {
    async fn evaluate(&self, _user_id: &str) -> Result<Vec<Milestone>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

struct MockCatalog {
    milestones: Vec<Milestone>,
}

impl MilestoneCatalogTrait for MockCatalog {
    fn load_all(&self) -> Result<Vec<Milestone>> {
        Ok(self.milestones.clone())
    }

    fn get_by_id(&self, milestone_id: &str) -> Result<Milestone> {
        self.milestones
            .iter()
            .find(|m| m.id == milestone_id)
            .cloned()
            .ok_or_else(Error::milestone_not_found)
    }
}

/// In-memory unlock store honoring the ensure/try_unlock contract.
struct MockAchievementRepository {
    rows: RwLock<Vec<UserMilestoneUnlock>>,
}

impl MockAchievementRepository {
    fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AchievementRepositoryTrait for MockAchievementRepository {
    async fn ensure(&self, user_id: &str, milestone_id: &str) -> Result<UserMilestoneUnlock> {
        let mut rows = self.rows.write().unwrap();
        if let Some(row) = rows
            .iter()
            .find(|r| r.user_id == user_id && r.milestone_id == milestone_id)
        {
            return Ok(row.clone());
        }
        let row = UserMilestoneUnlock {
            id: format!("um-{}", rows.len()),
            user_id: user_id.to_string(),
            milestone_id: milestone_id.to_string(),
            unlocked: false,
            unlocked_at: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn try_unlock(
        &self,
        user_id: &str,
        milestone_id: &str,
        unlocked_at: NaiveDateTime,
    ) -> Result<bool> {
        let mut rows = self.rows.write().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.user_id == user_id && r.milestone_id == milestone_id)
            .ok_or_else(Error::milestone_not_found)?;
        if row.unlocked {
            return Ok(false);
        }
        row.unlocked = true;
        row.unlocked_at = Some(unlocked_at);
        Ok(true)
    }

    fn load_unlocked(&self, user_id: &str) -> Result<Vec<UserMilestoneUnlock>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.unlocked)
            .cloned()
            .collect())
    }

    fn load_all_for_user(&self, user_id: &str) -> Result<Vec<UserMilestoneUnlock>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn count_unlocked(&self, user_id: &str) -> Result<i64> {
        Ok(self.load_unlocked(user_id)?.len() as i64)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn service_with_noop_evaluator() -> (GoalService, Arc<MockGoalRepository>, Arc<NoopEvaluator>) {
    let goal_repo = Arc::new(MockGoalRepository::new());
    let evaluator = Arc::new(NoopEvaluator::new());
    let service = GoalService::new(
        goal_repo.clone(),
        Arc::new(MockProgressLogRepository::new()),
        evaluator.clone(),
    );
    (service, goal_repo, evaluator)
}

fn input(user_id: &str, title: &str, category: &str) -> GoalInput {
    GoalInput {
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        category: category.to_string(),
        target_date: None,
    }
}

fn milestone(id: &str, milestone_type: MilestoneType, required_value: i32) -> Milestone {
    Milestone {
        id: id.to_string(),
        title: format!("Milestone {}", id),
        description: String::new(),
        icon: String::new(),
        required_value,
        milestone_type,
        category: None,
    }
}

// ============================================================================
// Status derivation and clamping
// ============================================================================

#[test]
fn test_status_is_pure_function_of_progress() {
    assert_eq!(GoalStatus::from_progress(0), GoalStatus::NotStarted);
    assert_eq!(GoalStatus::from_progress(1), GoalStatus::InProgress);
    assert_eq!(GoalStatus::from_progress(50), GoalStatus::InProgress);
    assert_eq!(GoalStatus::from_progress(99), GoalStatus::InProgress);
    assert_eq!(GoalStatus::from_progress(100), GoalStatus::Completed);
}

#[tokio::test]
async fn test_progress_is_clamped_not_rejected() {
    let (service, _, _) = service_with_noop_evaluator();
    let created = service.create_goal(input("u1", "Read", "Learning")).await.unwrap();

    let over = service.set_progress("u1", &created.goal.id, 250).await.unwrap();
    assert_eq!(over.goal.progress, 100);
    assert_eq!(over.goal.status, GoalStatus::Completed);

    let under = service.set_progress("u1", &created.goal.id, -10).await.unwrap();
    assert_eq!(under.goal.progress, 0);
    assert_eq!(under.goal.status, GoalStatus::NotStarted);
}

#[tokio::test]
async fn test_setting_same_progress_twice_is_idempotent() {
    let (service, _, _) = service_with_noop_evaluator();
    let created = service.create_goal(input("u1", "Read", "Learning")).await.unwrap();

    let first = service.set_progress("u1", &created.goal.id, 45).await.unwrap();
    let second = service.set_progress("u1", &created.goal.id, 45).await.unwrap();
    assert_eq!(first.goal.progress, second.goal.progress);
    assert_eq!(first.goal.status, second.goal.status);
    assert_eq!(second.goal.status, GoalStatus::InProgress);
}

// ============================================================================
// Creation and validation
// ============================================================================

#[tokio::test]
async fn test_create_goal_starts_not_started() {
    let (service, _, evaluator) = service_with_noop_evaluator();
    let created = service
        .create_goal(input("u1", "Run a marathon", "Health & Fitness"))
        .await
        .unwrap();

    assert_eq!(created.goal.progress, 0);
    assert_eq!(created.goal.status, GoalStatus::NotStarted);
    assert_eq!(created.goal.category, Category::HealthFitness);
    // Creation itself triggers an evaluation pass.
    assert_eq!(evaluator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_goal_rejects_empty_title() {
    let (service, repo, _) = service_with_noop_evaluator();
    let err = service
        .create_goal(input("u1", "   ", "Learning"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::MissingField(ref f)) if f == "title"
    ));
    // Aborted before any write.
    assert_eq!(repo.count_by_user("u1").unwrap(), 0);
}

#[tokio::test]
async fn test_create_goal_rejects_unknown_category() {
    let (service, repo, _) = service_with_noop_evaluator();
    let err = service
        .create_goal(input("u1", "Read", "Gardening"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::UnknownCategory(_))
    ));
    assert_eq!(repo.count_by_user("u1").unwrap(), 0);
}

#[tokio::test]
async fn test_past_target_date_is_discarded_goal_still_created() {
    let (service, _, _) = service_with_noop_evaluator();
    let yesterday = Utc::now().date_naive() - Duration::days(1);

    let mut raw = input("u1", "Read", "Learning");
    raw.target_date = Some(yesterday.format("%Y-%m-%d").to_string());

    let created = service.create_goal(raw).await.unwrap();
    assert_eq!(created.goal.target_date, None);
}

#[tokio::test]
async fn test_target_date_beyond_window_is_discarded() {
    let (service, _, _) = service_with_noop_evaluator();
    let too_far = Utc::now().date_naive() + Duration::days(400);

    let mut raw = input("u1", "Read", "Learning");
    raw.target_date = Some(too_far.format("%Y-%m-%d").to_string());

    let created = service.create_goal(raw).await.unwrap();
    assert_eq!(created.goal.target_date, None);
}

#[tokio::test]
async fn test_valid_target_date_is_kept() {
    let (service, _, _) = service_with_noop_evaluator();
    let next_month = Utc::now().date_naive() + Duration::days(30);

    let mut raw = input("u1", "Read", "Learning");
    raw.target_date = Some(next_month.format("%Y-%m-%d").to_string());

    let created = service.create_goal(raw).await.unwrap();
    assert_eq!(created.goal.target_date, Some(next_month));
}

#[tokio::test]
async fn test_malformed_target_date_is_discarded() {
    let (service, _, _) = service_with_noop_evaluator();
    let mut raw = input("u1", "Read", "Learning");
    raw.target_date = Some("not-a-date".to_string());

    let created = service.create_goal(raw).await.unwrap();
    assert_eq!(created.goal.target_date, None);
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
async fn test_foreign_goal_reported_as_not_found() {
    let (service, _, _) = service_with_noop_evaluator();
    let created = service.create_goal(input("u1", "Read", "Learning")).await.unwrap();

    let err = service
        .set_progress("u2", &created.goal.id, 50)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = service.delete_goal("u2", &created.goal.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_admin_override_deletes_any_goal() {
    let (service, repo, _) = service_with_noop_evaluator();
    let created = service.create_goal(input("u1", "Read", "Learning")).await.unwrap();

    service.delete_goal_admin(&created.goal.id).await.unwrap();
    assert_eq!(repo.count_by_user("u1").unwrap(), 0);
}

// ============================================================================
// Progress log
// ============================================================================

#[tokio::test]
async fn test_each_mutation_appends_one_history_entry() {
    let goal_repo = Arc::new(MockGoalRepository::new());
    let log_repo = Arc::new(MockProgressLogRepository::new());
    let service = GoalService::new(
        goal_repo,
        log_repo.clone(),
        Arc::new(NoopEvaluator::new()),
    );

    let created = service.create_goal(input("u1", "Read", "Learning")).await.unwrap();
    service.set_progress("u1", &created.goal.id, 30).await.unwrap();
    service.set_progress("u1", &created.goal.id, 60).await.unwrap();

    let history = service.progress_history("u1", &created.goal.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].progress, 30);
    assert_eq!(history[1].progress, 60);
}

// ============================================================================
// Listing and filtering
// ============================================================================

async fn seed_listing_fixture(service: &GoalService) {
    let mut run = input("u1", "Run every morning", "Health & Fitness");
    run.description = "5k before work".to_string();
    service.create_goal(run).await.unwrap();

    let mut cook = input("u1", "Cook more", "Other");
    cook.description = "includes a running grocery list".to_string();
    service.create_goal(cook).await.unwrap();

    service
        .create_goal(input("u1", "Read twelve books", "Learning"))
        .await
        .unwrap();
    service
        .create_goal(input("u2", "Run a marathon", "Health & Fitness"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_matches_title_or_description_case_insensitive() {
    let (service, _, _) = service_with_noop_evaluator();
    seed_listing_fixture(&service).await;

    let filters = GoalFilters::from_query(Some("RUN"), "All", "All").unwrap();
    let listing = service.list_goals("u1", &filters).unwrap();

    let titles: Vec<&str> = listing.goals.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Run every morning"));
    // Matched via description.
    assert!(titles.contains(&"Cook more"));
}

#[tokio::test]
async fn test_category_filter_is_exact() {
    let (service, _, _) = service_with_noop_evaluator();
    seed_listing_fixture(&service).await;

    let filters = GoalFilters::from_query(None, "Health & Fitness", "All").unwrap();
    let listing = service.list_goals("u1", &filters).unwrap();

    assert_eq!(listing.goals.len(), 1);
    assert_eq!(listing.goals[0].title, "Run every morning");
}

#[tokio::test]
async fn test_filters_compose_with_and() {
    let (service, _, _) = service_with_noop_evaluator();
    seed_listing_fixture(&service).await;

    // "run" alone matches two goals; adding the category narrows to one.
    let filters = GoalFilters::from_query(Some("run"), "Health & Fitness", "All").unwrap();
    let listing = service.list_goals("u1", &filters).unwrap();

    assert_eq!(listing.goals.len(), 1);
    assert_eq!(listing.goals[0].category, Category::HealthFitness);
}

#[tokio::test]
async fn test_status_filter() {
    let (service, _, _) = service_with_noop_evaluator();
    seed_listing_fixture(&service).await;
    let all = GoalFilters::default();
    let first_id = service.list_goals("u1", &all).unwrap().goals[0].id.clone();
    service.set_progress("u1", &first_id, 100).await.unwrap();

    let filters = GoalFilters::from_query(None, "All", "Completed").unwrap();
    let listing = service.list_goals("u1", &filters).unwrap();
    assert_eq!(listing.goals.len(), 1);
    assert_eq!(listing.goals[0].id, first_id);
}

#[tokio::test]
async fn test_category_list_derived_from_filtered_set() {
    let (service, _, _) = service_with_noop_evaluator();
    seed_listing_fixture(&service).await;

    // Unfiltered: all three of u1's categories show up.
    let listing = service.list_goals("u1", &GoalFilters::default()).unwrap();
    assert_eq!(
        listing.categories,
        vec!["Health & Fitness", "Learning", "Other"]
    );

    // Filtering first, then distinct: the search drops "Learning".
    let filters = GoalFilters::from_query(Some("run"), "All", "All").unwrap();
    let listing = service.list_goals("u1", &filters).unwrap();
    assert_eq!(listing.categories, vec!["Health & Fitness", "Other"]);
}

#[test]
fn test_all_sentinel_means_no_constraint() {
    let filters = GoalFilters::from_query(None, "All", "All").unwrap();
    assert_eq!(filters, GoalFilters::default());

    let filters = GoalFilters::from_query(Some("  "), "All", "All").unwrap();
    assert_eq!(filters.search, None);
}

// ============================================================================
// End-to-end scenario with a real evaluator
// ============================================================================

#[tokio::test]
async fn test_completion_unlocks_exactly_once() {
    let goal_repo = Arc::new(MockGoalRepository::new());
    let achievement_repo = Arc::new(MockAchievementRepository::new());
    let catalog = Arc::new(MockCatalog {
        milestones: vec![
            milestone("m-complete-1", MilestoneType::CompletedGoals, 1),
            milestone("m-progress-50", MilestoneType::ProgressThreshold, 50),
        ],
    });
    let evaluator = Arc::new(MilestoneEvaluator::new(
        catalog,
        goal_repo.clone(),
        achievement_repo.clone(),
    ));
    let service = GoalService::new(
        goal_repo,
        Arc::new(MockProgressLogRepository::new()),
        evaluator,
    );

    let created = service.create_goal(input("u1", "Read", "Learning")).await.unwrap();
    assert!(created.newly_unlocked.is_empty());

    // 45 < 50: neither milestone fires.
    let at_45 = service.set_progress("u1", &created.goal.id, 45).await.unwrap();
    assert_eq!(at_45.goal.status, GoalStatus::InProgress);
    assert!(at_45.newly_unlocked.is_empty());

    // 100: both the progress-threshold and completed-goals milestones fire.
    let at_100 = service.set_progress("u1", &created.goal.id, 100).await.unwrap();
    assert_eq!(at_100.goal.status, GoalStatus::Completed);
    let unlocked: Vec<&str> = at_100
        .newly_unlocked
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert!(unlocked.contains(&"m-complete-1"));
    assert!(unlocked.contains(&"m-progress-50"));

    // The duplicate submission changes nothing: still unlocked, not twice.
    let again = service.set_progress("u1", &created.goal.id, 100).await.unwrap();
    assert!(again.newly_unlocked.is_empty());
    assert_eq!(achievement_repo.count_unlocked("u1").unwrap(), 2);
}
