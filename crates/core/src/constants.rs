/// Lower bound of the progress percentage.
pub const MIN_PROGRESS: i32 = 0;

/// Upper bound of the progress percentage.
pub const MAX_PROGRESS: i32 = 100;

/// How far in the future a target date may lie, in days.
pub const TARGET_DATE_WINDOW_DAYS: i64 = 365;

/// Number of recently created goals shown on the dashboard.
pub const RECENT_GOALS_LIMIT: usize = 3;

/// Number of recent achievements shown on the dashboard.
pub const RECENT_ACHIEVEMENTS_LIMIT: usize = 3;

/// Sentinel accepted at the string-keyed boundary meaning "no filter".
pub const FILTER_ALL: &str = "All";
