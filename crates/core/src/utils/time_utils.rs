use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Current instant in UTC, without timezone annotation.
///
/// This is the single source of truth for "now" across the engine: goal
/// creation timestamps, progress-log entries, and unlock timestamps all go
/// through here.
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Today's calendar date in UTC.
///
/// Used for target-date window validation and as the starting day of the
/// streak walk.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Truncates a timestamp to its calendar date.
///
/// Unlock timestamps are reduced to dates with this before streak
/// membership checks.
pub fn date_of(instant: NaiveDateTime) -> NaiveDate {
    instant.date()
}
