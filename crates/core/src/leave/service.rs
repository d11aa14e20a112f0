//! Leave submission rules: validates input and freezes the working-day count.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use leavebook_shared::types::{LeaveAdjustmentId, LeaveApplicationId, TenantId};

use super::error::LeaveError;
use super::types::{
    ApplicationStatus, DateSpan, LeaveAdjustment, LeaveApplication, NewLeaveAdjustment,
    NewLeaveApplication,
};
use super::working_days::{daily_breakdown, span_working_days};
use crate::calendar::CalendarPolicy;

/// Working days a span would consume, with the per-date contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePreview {
    /// The span evaluated.
    pub span: DateSpan,
    /// Total working days.
    pub days: Decimal,
    /// Contribution of each date in the span.
    pub breakdown: Vec<(NaiveDate, Decimal)>,
}

/// Service for leave submission.
pub struct LeaveService;

impl LeaveService {
    /// Trims a leave type name, falling back to `default_leave_type` when blank.
    ///
    /// # Errors
    ///
    /// Returns `LeaveError::MissingLeaveType` if both are blank.
    pub fn normalize_leave_type(raw: &str, default_leave_type: &str) -> Result<String, LeaveError> {
        let name = match raw.trim() {
            "" => default_leave_type.trim(),
            name => name,
        };
        if name.is_empty() {
            return Err(LeaveError::MissingLeaveType);
        }
        Ok(name.to_string())
    }

    /// Working days a span consumes under an employee's calendar.
    #[must_use]
    pub fn preview(policy: &CalendarPolicy, span: DateSpan) -> LeavePreview {
        let breakdown: Vec<(NaiveDate, Decimal)> =
            daily_breakdown(&policy.schedule, &policy.holidays, &span).collect();
        let days = breakdown.iter().map(|(_, d)| *d).sum();
        LeavePreview {
            span,
            days,
            breakdown,
        }
    }

    /// Validates a new application and computes the days it uses.
    ///
    /// The result is approved on creation and its `days_used` never changes
    /// afterwards, even if the schedule or holidays are edited later.
    ///
    /// # Errors
    ///
    /// Returns `LeaveError::InvalidRange` if the end precedes the start and
    /// `LeaveError::MissingLeaveType` if no leave type can be resolved.
    pub fn prepare_application(
        tenant_id: TenantId,
        input: NewLeaveApplication,
        policy: &CalendarPolicy,
        default_leave_type: &str,
        now: DateTime<Utc>,
    ) -> Result<LeaveApplication, LeaveError> {
        let span = DateSpan::new(input.start, input.start_half, input.end, input.end_half)?;
        let leave_type = Self::normalize_leave_type(&input.leave_type, default_leave_type)?;
        let days_used = span_working_days(policy, &span);

        info!(
            tenant_id = %tenant_id,
            employee_id = %input.employee_id,
            leave_type = %leave_type,
            start = %span.start,
            end = %span.end,
            %days_used,
            "prepared leave application"
        );

        Ok(LeaveApplication {
            id: LeaveApplicationId::new(),
            tenant_id,
            employee_id: input.employee_id,
            leave_type,
            span,
            days_used,
            status: ApplicationStatus::Approved,
            remarks: input.remarks.trim().to_string(),
            created_at: now,
        })
    }

    /// Validates a new adjustment. The delta may be negative or zero.
    ///
    /// # Errors
    ///
    /// Returns `LeaveError::MissingLeaveType` if no leave type can be resolved.
    pub fn prepare_adjustment(
        tenant_id: TenantId,
        input: NewLeaveAdjustment,
        default_leave_type: &str,
        now: DateTime<Utc>,
    ) -> Result<LeaveAdjustment, LeaveError> {
        let leave_type = Self::normalize_leave_type(&input.leave_type, default_leave_type)?;
        Ok(LeaveAdjustment {
            id: LeaveAdjustmentId::new(),
            tenant_id,
            employee_id: input.employee_id,
            leave_type,
            date: input.date,
            delta_days: input.delta_days,
            remarks: input.remarks.trim().to_string(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidayCalendar, WeeklySchedule};
    use crate::leave::types::HalfDay;
    use leavebook_shared::types::EmployeeId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(start: NaiveDate, end: NaiveDate, leave_type: &str) -> NewLeaveApplication {
        NewLeaveApplication {
            employee_id: EmployeeId::new(),
            leave_type: leave_type.to_string(),
            start,
            start_half: HalfDay::Am,
            end,
            end_half: HalfDay::Pm,
            remarks: "  family trip ".to_string(),
        }
    }

    #[test]
    fn test_normalize_leave_type() {
        assert_eq!(
            LeaveService::normalize_leave_type("  Sick Leave ", "Annual Leave"),
            Ok("Sick Leave".to_string())
        );
        assert_eq!(
            LeaveService::normalize_leave_type("   ", "Annual Leave"),
            Ok("Annual Leave".to_string())
        );
        assert_eq!(
            LeaveService::normalize_leave_type("", " "),
            Err(LeaveError::MissingLeaveType)
        );
    }

    #[test]
    fn test_prepare_application_freezes_days() {
        let tenant_id = TenantId::new();
        let policy = CalendarPolicy::default();
        let now = Utc::now();

        // Friday 2024-03-08 through Monday 2024-03-11: two working days.
        let app = LeaveService::prepare_application(
            tenant_id,
            input(date(2024, 3, 8), date(2024, 3, 11), ""),
            &policy,
            "Annual Leave",
            now,
        )
        .unwrap();

        assert_eq!(app.tenant_id, tenant_id);
        assert_eq!(app.leave_type, "Annual Leave");
        assert_eq!(app.days_used, dec!(2));
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert_eq!(app.remarks, "family trip");
        assert_eq!(app.created_at, now);
    }

    #[test]
    fn test_prepare_application_rejects_reversed_range() {
        let start = date(2024, 3, 11);
        let end = date(2024, 3, 8);
        let result = LeaveService::prepare_application(
            TenantId::new(),
            input(start, end, "Annual Leave"),
            &CalendarPolicy::default(),
            "Annual Leave",
            Utc::now(),
        );
        assert_eq!(result, Err(LeaveError::InvalidRange { start, end }));
    }

    #[test]
    fn test_prepare_adjustment_allows_negative_delta() {
        let adj = LeaveService::prepare_adjustment(
            TenantId::new(),
            NewLeaveAdjustment {
                employee_id: EmployeeId::new(),
                leave_type: "Annual Leave".to_string(),
                date: date(2024, 1, 15),
                delta_days: dec!(-1.5),
                remarks: String::new(),
            },
            "Annual Leave",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(adj.delta_days, dec!(-1.5));
    }

    #[test]
    fn test_preview_lists_each_date() {
        let holidays: HolidayCalendar = [date(2024, 3, 5)].into_iter().collect();
        let policy = CalendarPolicy::new(WeeklySchedule::new(), holidays);
        let span = DateSpan::whole_days(date(2024, 3, 4), date(2024, 3, 10)).unwrap();

        let preview = LeaveService::preview(&policy, span);

        assert_eq!(preview.days, dec!(4));
        assert_eq!(preview.breakdown.len(), 7);
        assert_eq!(preview.breakdown[1], (date(2024, 3, 5), Decimal::ZERO));
    }
}
