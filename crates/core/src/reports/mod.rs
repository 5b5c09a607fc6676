//! Reporting queries module.

mod reports_model;
mod reports_service;
mod reports_traits;

pub use reports_model::{CategoryCount, CompletionCounts, GoalTimeline, StatusCount};
pub use reports_service::ReportsService;
pub use reports_traits::ReportsServiceTrait;
