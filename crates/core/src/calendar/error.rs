//! Calendar error types.

use chrono::Weekday;
use thiserror::Error;

/// Errors raised while building an employee calendar from stored rows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// Weekday index outside 0 (Monday) ..= 6 (Sunday).
    #[error("Invalid weekday index: {0} (expected 0=Monday..6=Sunday)")]
    InvalidWeekday(i32),

    /// More than one schedule row for the same weekday.
    #[error("Duplicate schedule row for {0}")]
    DuplicateWeekday(Weekday),
}
