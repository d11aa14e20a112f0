//! Leave error types.
//!
//! The engine is pure computation over already-resolved rows, so this set is
//! narrow: only input that must be rejected before an application or
//! adjustment is created shows up here. Missing configuration degrades to
//! zero and out-of-band service years are clamped; neither is an error.

use chrono::NaiveDate;
use thiserror::Error;
use leavebook_shared::AppError;

use crate::calendar::CalendarError;
use crate::entitlement::EntitlementError;

/// Errors raised by leave submission and record parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaveError {
    /// End date precedes start date.
    #[error("Invalid leave range: end {end} is before start {start}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// No leave type was given.
    #[error("Leave type is required")]
    MissingLeaveType,

    /// Half-day marker other than AM or PM.
    #[error("Invalid half-day marker: {0} (expected AM or PM)")]
    InvalidHalfDay(String),

    /// Unknown application status.
    #[error("Invalid application status: {0}")]
    InvalidStatus(String),

    /// The employee is not part of the loaded tenant book.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(uuid::Uuid),

    /// Calendar rows were malformed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Entitlement configuration was malformed.
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),
}

impl From<LeaveError> for AppError {
    fn from(err: LeaveError) -> Self {
        match err {
            LeaveError::EmployeeNotFound(_) => Self::NotFound(err.to_string()),
            LeaveError::Entitlement(EntitlementError::InvalidTableConfig(_)) => {
                Self::Configuration(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_mapping() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let app: AppError = LeaveError::InvalidRange { start, end }.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
        assert_eq!(
            app.to_string(),
            "Validation error: Invalid leave range: end 2024-03-04 is before start 2024-03-05"
        );

        let app: AppError = LeaveError::EmployeeNotFound(uuid::Uuid::nil()).into();
        assert_eq!(app.error_code(), "NOT_FOUND");

        let app: AppError =
            LeaveError::from(EntitlementError::InvalidTableConfig("bad".into())).into();
        assert_eq!(app.error_code(), "CONFIGURATION_ERROR");
    }
}
