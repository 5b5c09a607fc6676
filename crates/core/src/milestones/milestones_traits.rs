use async_trait::async_trait;

use crate::errors::Result;
use crate::milestones::milestones_model::Milestone;

/// Trait for the administered milestone catalog. Read-only from the
/// engine's perspective; bounded and small.
pub trait MilestoneCatalogTrait: Send + Sync {
    /// The full catalog, title ascending.
    fn load_all(&self) -> Result<Vec<Milestone>>;

    fn get_by_id(&self, milestone_id: &str) -> Result<Milestone>;
}

/// Trait for the milestone evaluator.
#[async_trait]
pub trait MilestoneEvaluatorTrait: Send + Sync {
    /// Scans the catalog against the user's current goal aggregate and
    /// unlocks every newly qualifying milestone. Returns the milestones
    /// unlocked by this call; redundant calls are no-ops for milestones
    /// already unlocked.
    async fn evaluate(&self, user_id: &str) -> Result<Vec<Milestone>>;
}
