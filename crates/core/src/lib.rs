//! Stride Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Stride: goal progress
//! tracking, milestone evaluation, the achievement ledger, and the
//! dashboard/report aggregations built on top of them. It is
//! database-agnostic and defines traits that are implemented by the
//! `storage-sqlite` crate.

pub mod achievements;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod goals;
pub mod milestones;
pub mod reports;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
