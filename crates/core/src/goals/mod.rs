//! Goals module - domain models, services, and traits.

mod goals_model;
mod goals_service;
mod goals_traits;

pub use goals_model::{
    Category, Goal, GoalFilters, GoalInput, GoalListing, GoalMutation, GoalProgressEntry,
    GoalStatus, NewGoal,
};
pub use goals_service::GoalService;
pub use goals_traits::{
    GoalProgressLogRepositoryTrait, GoalRepositoryTrait, GoalServiceTrait,
};

#[cfg(test)]
mod goals_service_tests;
