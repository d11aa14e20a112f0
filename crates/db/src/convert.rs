//! Conversions between stored rows and core leave types.

use chrono::Utc;
use leavebook_core::calendar::{
    CalendarError, DayType, Holiday, HolidayKind, WorkScheduleDay, weekday_from_index,
};
use leavebook_core::entitlement::{
    EntitlementError, LeaveEntitlement, ServiceYear, StoredLeaveDefault,
};
use leavebook_core::leave::{
    DateSpan, Employee, LeaveAdjustment, LeaveApplication, LeaveError,
};
use leavebook_shared::types::{
    EmployeeId, HolidayId, LeaveAdjustmentId, LeaveApplicationId, TenantId,
};

use crate::entities::{
    employee_leave_entitlements, employee_work_schedule, employees, holidays, leave_adjustments,
    leave_applications, leave_defaults,
};

impl From<employees::Model> for Employee {
    fn from(m: employees::Model) -> Self {
        Self {
            id: EmployeeId::from_uuid(m.id),
            tenant_id: TenantId::from_uuid(m.tenant_id),
            code: m.code,
            full_name: m.full_name,
            join_date: m.join_date,
            exit_date: m.exit_date,
            holiday_group: m.holiday_group,
        }
    }
}

impl TryFrom<employee_work_schedule::Model> for WorkScheduleDay {
    type Error = CalendarError;

    fn try_from(m: employee_work_schedule::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: EmployeeId::from_uuid(m.employee_id),
            weekday: weekday_from_index(m.weekday)?,
            working: m.working,
            day_type: DayType::parse_lenient(&m.day_type),
        })
    }
}

impl From<holidays::Model> for Holiday {
    fn from(m: holidays::Model) -> Self {
        Self {
            id: HolidayId::from_uuid(m.id),
            tenant_id: TenantId::from_uuid(m.tenant_id),
            group_code: m.group_code,
            name: m.name,
            date: m.date,
            kind: HolidayKind::from_half_day_flag(m.is_half_day),
        }
    }
}

impl From<leave_defaults::Model> for StoredLeaveDefault {
    fn from(m: leave_defaults::Model) -> Self {
        Self {
            leave_type: m.leave_type,
            prorated: m.prorated,
            yearly_reset: m.yearly_reset,
            table_json: m.table_json,
        }
    }
}

impl TryFrom<employee_leave_entitlements::Model> for LeaveEntitlement {
    type Error = EntitlementError;

    fn try_from(m: employee_leave_entitlements::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: EmployeeId::from_uuid(m.employee_id),
            year_of_service: ServiceYear::new(i64::from(m.year_of_service))?,
            leave_type: m.leave_type,
            days: m.days,
        })
    }
}

impl TryFrom<leave_applications::Model> for LeaveApplication {
    type Error = LeaveError;

    fn try_from(m: leave_applications::Model) -> Result<Self, Self::Error> {
        let span = DateSpan::new(
            m.start_date,
            m.start_half.parse()?,
            m.end_date,
            m.end_half.parse()?,
        )?;
        Ok(Self {
            id: LeaveApplicationId::from_uuid(m.id),
            tenant_id: TenantId::from_uuid(m.tenant_id),
            employee_id: EmployeeId::from_uuid(m.employee_id),
            leave_type: m.leave_type,
            span,
            days_used: m.days_used,
            status: m.status.parse()?,
            remarks: m.remarks,
            created_at: m.created_at.with_timezone(&Utc),
        })
    }
}

impl From<leave_adjustments::Model> for LeaveAdjustment {
    fn from(m: leave_adjustments::Model) -> Self {
        Self {
            id: LeaveAdjustmentId::from_uuid(m.id),
            tenant_id: TenantId::from_uuid(m.tenant_id),
            employee_id: EmployeeId::from_uuid(m.employee_id),
            leave_type: m.leave_type,
            date: m.date,
            delta_days: m.delta_days,
            remarks: m.remarks,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use leavebook_core::leave::{ApplicationStatus, HalfDay};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn application_row() -> leave_applications::Model {
        leave_applications::Model {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            employee_id: Uuid::now_v7(),
            leave_type: "Annual Leave".to_string(),
            start_date: date(2024, 3, 4),
            start_half: "PM".to_string(),
            end_date: date(2024, 3, 5),
            end_half: "PM".to_string(),
            days_used: dec!(1.5),
            status: "Approved".to_string(),
            remarks: String::new(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_application_row_converts() {
        let app = LeaveApplication::try_from(application_row()).unwrap();
        assert_eq!(app.span.start_half, HalfDay::Pm);
        assert_eq!(app.days_used, dec!(1.5));
        assert_eq!(app.status, ApplicationStatus::Approved);
    }

    #[test]
    fn test_application_row_with_bad_half_is_rejected() {
        let mut row = application_row();
        row.end_half = "XX".to_string();
        assert_eq!(
            LeaveApplication::try_from(row),
            Err(LeaveError::InvalidHalfDay("XX".to_string()))
        );
    }

    #[test]
    fn test_application_row_with_unknown_status_is_rejected() {
        let mut row = application_row();
        row.status = "Withdrawn".to_string();
        assert_eq!(
            LeaveApplication::try_from(row),
            Err(LeaveError::InvalidStatus("Withdrawn".to_string()))
        );
    }

    #[test]
    fn test_schedule_row_converts() {
        let row = employee_work_schedule::Model {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            employee_id: Uuid::now_v7(),
            weekday: 5,
            working: true,
            day_type: "half".to_string(),
        };
        let day = WorkScheduleDay::try_from(row.clone()).unwrap();
        assert_eq!(day.weekday, Weekday::Sat);
        assert_eq!(day.day_type, DayType::Half);

        let bad = employee_work_schedule::Model { weekday: 7, ..row };
        assert_eq!(
            WorkScheduleDay::try_from(bad),
            Err(CalendarError::InvalidWeekday(7))
        );
    }

    #[test]
    fn test_entitlement_row_out_of_band() {
        let row = employee_leave_entitlements::Model {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            employee_id: Uuid::now_v7(),
            year_of_service: 51,
            leave_type: "Annual Leave".to_string(),
            days: dec!(14),
        };
        assert_eq!(
            LeaveEntitlement::try_from(row),
            Err(EntitlementError::ServiceYearOutOfRange(51))
        );
    }

    #[test]
    fn test_half_day_holiday_converts() {
        let row = holidays::Model {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            group_code: "HQ".to_string(),
            name: "Eve".to_string(),
            date: date(2024, 12, 24),
            is_half_day: true,
        };
        assert_eq!(Holiday::from(row).kind, HolidayKind::Half);
    }
}
