//! Employee calendar policy: which dates are working days.
//!
//! A [`CalendarPolicy`] combines the employee's [`WeeklySchedule`] with the
//! [`HolidayCalendar`] of the employee's holiday group. Holidays override the
//! weekday configuration regardless of what the schedule says.

pub mod error;
pub mod holiday;
pub mod schedule;

pub use error::CalendarError;
pub use holiday::{Holiday, HolidayCalendar, HolidayKind};
pub use schedule::{
    DayType, ScheduleEntry, WeeklySchedule, WorkScheduleDay, weekday_from_index, weekday_index,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Working-day rules for one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPolicy {
    /// Weekly work pattern.
    pub schedule: WeeklySchedule,
    /// Holidays of the employee's group.
    pub holidays: HolidayCalendar,
}

impl CalendarPolicy {
    /// Creates a policy from its parts.
    #[must_use]
    pub fn new(schedule: WeeklySchedule, holidays: HolidayCalendar) -> Self {
        Self { schedule, holidays }
    }

    /// Returns the day type if `date` is a scheduled working day, ignoring holidays.
    #[must_use]
    pub fn scheduled_day(&self, date: NaiveDate) -> Option<DayType> {
        let entry = self.schedule.resolve(date.weekday());
        entry.working.then_some(entry.day_type)
    }

    /// Returns true if `date` is a scheduled working day and not a full holiday.
    #[must_use]
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.scheduled_day(date).is_some()
            && self.holidays.kind_on(date) != Some(HolidayKind::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_holiday_overrides_working_weekday() {
        let christmas = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(); // Wednesday
        let policy = CalendarPolicy::new(
            WeeklySchedule::new(),
            [christmas].into_iter().collect(),
        );
        assert_eq!(policy.scheduled_day(christmas), Some(DayType::Full));
        assert!(!policy.is_working_day(christmas));
    }

    #[test]
    fn test_schedule_can_make_weekend_working() {
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let policy = CalendarPolicy::new(
            WeeklySchedule::new().with(Weekday::Sat, true, DayType::Half),
            HolidayCalendar::new(),
        );
        assert_eq!(policy.scheduled_day(saturday), Some(DayType::Half));
        assert!(policy.is_working_day(saturday));
    }
}
