//! Entitlement error types.

use thiserror::Error;

/// Errors raised while reading or building entitlement tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntitlementError {
    /// A service-year band outside 1..=50 was constructed explicitly.
    #[error("Service year {0} is outside 1..=50")]
    ServiceYearOutOfRange(i64),

    /// A stored table blob could not be parsed.
    #[error("Invalid entitlement table configuration: {0}")]
    InvalidTableConfig(String),

    /// Leave type name is blank.
    #[error("Leave type must not be blank")]
    BlankLeaveType,
}
