//! Leave domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use leavebook_shared::types::{EmployeeId, LeaveAdjustmentId, LeaveApplicationId, TenantId};

use super::error::LeaveError;

/// Which half of a day a leave request starts or ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfDay {
    /// Morning.
    #[serde(rename = "AM")]
    Am,
    /// Afternoon.
    #[serde(rename = "PM")]
    Pm,
}

impl HalfDay {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

impl fmt::Display for HalfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HalfDay {
    type Err = LeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Self::Am),
            "PM" => Ok(Self::Pm),
            _ => Err(LeaveError::InvalidHalfDay(s.to_string())),
        }
    }
}

/// Status of a stored leave application. Only approved applications consume balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Counted toward usage. Applications submitted here are approved on creation.
    #[default]
    Approved,
    /// Awaiting a decision elsewhere.
    Pending,
    /// Rejected.
    Rejected,
    /// Withdrawn.
    Cancelled,
}

impl ApplicationStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true if applications in this status reduce the balance.
    #[must_use]
    pub const fn consumes_balance(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl FromStr for ApplicationStatus {
    type Err = LeaveError;

    /// A blank status is `Approved`, as legacy rows were written without one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            "rejected" => Ok(Self::Rejected),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(LeaveError::InvalidStatus(s.to_string())),
        }
    }
}

/// A half-day-aware inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First date.
    pub start: NaiveDate,
    /// Half the first date starts on.
    pub start_half: HalfDay,
    /// Last date.
    pub end: NaiveDate,
    /// Half the last date ends on.
    pub end_half: HalfDay,
}

impl DateSpan {
    /// Creates a span, rejecting `end < start`.
    pub fn new(
        start: NaiveDate,
        start_half: HalfDay,
        end: NaiveDate,
        end_half: HalfDay,
    ) -> Result<Self, LeaveError> {
        if end < start {
            return Err(LeaveError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            start_half,
            end,
            end_half,
        })
    }

    /// A whole-days span from the morning of `start` to the afternoon of `end`.
    pub fn whole_days(start: NaiveDate, end: NaiveDate) -> Result<Self, LeaveError> {
        Self::new(start, HalfDay::Am, end, HalfDay::Pm)
    }
}

/// The employee fields the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee ID.
    pub id: EmployeeId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Employee code.
    pub code: String,
    /// Display name.
    pub full_name: String,
    /// Join date; absent means year of service 1.
    pub join_date: Option<NaiveDate>,
    /// Exit date, if the employee has left.
    pub exit_date: Option<NaiveDate>,
    /// Holiday group (may be empty).
    pub holiday_group: String,
}

impl Employee {
    /// Returns true if the employee had left on or before `as_of`.
    #[must_use]
    pub fn has_exited(&self, as_of: NaiveDate) -> bool {
        self.exit_date.is_some_and(|exit| exit <= as_of)
    }
}

/// A recorded leave application. `days_used` is frozen at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Application ID.
    pub id: LeaveApplicationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Employee on leave.
    pub employee_id: EmployeeId,
    /// Leave type name.
    pub leave_type: String,
    /// Requested span.
    pub span: DateSpan,
    /// Working days consumed, computed when the application was submitted.
    pub days_used: Decimal,
    /// Application status.
    pub status: ApplicationStatus,
    /// Free-text remarks.
    pub remarks: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A manual, signed correction to a leave balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAdjustment {
    /// Adjustment ID.
    pub id: LeaveAdjustmentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Employee adjusted.
    pub employee_id: EmployeeId,
    /// Leave type name.
    pub leave_type: String,
    /// Effective date.
    pub date: NaiveDate,
    /// Days added (negative to deduct).
    pub delta_days: Decimal,
    /// Free-text remarks.
    pub remarks: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a leave application.
#[derive(Debug, Clone)]
pub struct NewLeaveApplication {
    /// Employee on leave.
    pub employee_id: EmployeeId,
    /// Leave type name; blank falls back to the configured default.
    pub leave_type: String,
    /// Requested start date.
    pub start: NaiveDate,
    /// Half the start date begins on.
    pub start_half: HalfDay,
    /// Requested end date.
    pub end: NaiveDate,
    /// Half the end date finishes on.
    pub end_half: HalfDay,
    /// Free-text remarks.
    pub remarks: String,
}

/// Input for recording a leave adjustment.
#[derive(Debug, Clone)]
pub struct NewLeaveAdjustment {
    /// Employee adjusted.
    pub employee_id: EmployeeId,
    /// Leave type name; blank falls back to the configured default.
    pub leave_type: String,
    /// Effective date.
    pub date: NaiveDate,
    /// Days added (negative to deduct).
    pub delta_days: Decimal,
    /// Free-text remarks.
    pub remarks: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_day_parse() {
        assert_eq!("am".parse::<HalfDay>(), Ok(HalfDay::Am));
        assert_eq!(" PM ".parse::<HalfDay>(), Ok(HalfDay::Pm));
        assert_eq!(
            "noon".parse::<HalfDay>(),
            Err(LeaveError::InvalidHalfDay("noon".to_string()))
        );
        assert_eq!(HalfDay::Pm.to_string(), "PM");
    }

    #[test]
    fn test_status_parse_and_usage() {
        assert_eq!("".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Approved));
        assert_eq!("Pending".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Pending));
        assert!("archived".parse::<ApplicationStatus>().is_err());
        assert!(ApplicationStatus::Approved.consumes_balance());
        assert!(!ApplicationStatus::Rejected.consumes_balance());
    }

    #[test]
    fn test_date_span_rejects_reversed_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(
            DateSpan::whole_days(start, end),
            Err(LeaveError::InvalidRange { start, end })
        );
        assert!(DateSpan::whole_days(end, start).is_ok());
        assert!(DateSpan::whole_days(start, start).is_ok());
    }

    #[test]
    fn test_employee_has_exited() {
        let mut employee = Employee {
            id: EmployeeId::new(),
            tenant_id: TenantId::new(),
            code: "E001".to_string(),
            full_name: "Test".to_string(),
            join_date: None,
            exit_date: None,
            holiday_group: String::new(),
        };
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(!employee.has_exited(as_of));
        employee.exit_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert!(employee.has_exited(as_of));
        employee.exit_date = NaiveDate::from_ymd_opt(2024, 6, 2);
        assert!(!employee.has_exited(as_of));
    }
}
