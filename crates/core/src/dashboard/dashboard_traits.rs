use crate::dashboard::dashboard_model::DashboardSummary;
use crate::errors::Result;

/// Trait for the dashboard aggregator. Read-only; composes the goal store
/// and the achievement ledger without side effects.
pub trait DashboardServiceTrait: Send + Sync {
    fn summarize(&self, user_id: &str) -> Result<DashboardSummary>;
}
