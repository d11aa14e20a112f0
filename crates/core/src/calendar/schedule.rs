//! Per-employee weekly work schedule.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use leavebook_shared::types::EmployeeId;

use super::error::CalendarError;

/// Whether a working weekday is a full or a half day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayType {
    /// Full working day (1.0).
    #[default]
    Full,
    /// Half working day (0.5).
    Half,
}

impl DayType {
    /// Days consumed by taking this whole day off.
    #[must_use]
    pub fn weight(self) -> Decimal {
        match self {
            Self::Full => Decimal::ONE,
            Self::Half => Decimal::new(5, 1),
        }
    }

    /// Parses the stored representation. Anything other than `Half`
    /// (case-insensitive) is a full day, matching how rows were written.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("half") {
            Self::Half
        } else {
            Self::Full
        }
    }

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Half => "Half",
        }
    }
}

/// One stored schedule row: (employee, weekday) is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkScheduleDay {
    /// Employee this row belongs to.
    pub employee_id: EmployeeId,
    /// Weekday this row configures.
    pub weekday: Weekday,
    /// Whether the employee is expected to work on this weekday.
    pub working: bool,
    /// Full or half day when working.
    pub day_type: DayType,
}

/// Resolved status of one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Whether the weekday is a working day.
    pub working: bool,
    /// Full or half day.
    pub day_type: DayType,
}

/// Converts a stored weekday index (0=Monday .. 6=Sunday).
pub fn weekday_from_index(index: i32) -> Result<Weekday, CalendarError> {
    match index {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        other => Err(CalendarError::InvalidWeekday(other)),
    }
}

/// Returns the stored weekday index (0=Monday .. 6=Sunday).
#[must_use]
pub fn weekday_index(weekday: Weekday) -> i32 {
    // num_days_from_monday is always 0..=6
    i32::try_from(weekday.num_days_from_monday()).unwrap_or_default()
}

/// Seven weekday slots; an empty slot falls back to the default policy
/// (Monday to Friday full working days, weekend off).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [Option<ScheduleEntry>; 7],
}

impl WeeklySchedule {
    /// Creates a schedule with no explicit rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from stored rows.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::DuplicateWeekday` if two rows configure the same weekday.
    pub fn from_rows<'a, I>(rows: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = &'a WorkScheduleDay>,
    {
        let mut schedule = Self::new();
        for row in rows {
            let slot = &mut schedule.days[slot_index(row.weekday)];
            if slot.is_some() {
                return Err(CalendarError::DuplicateWeekday(row.weekday));
            }
            *slot = Some(ScheduleEntry {
                working: row.working,
                day_type: row.day_type,
            });
        }
        Ok(schedule)
    }

    /// Sets an explicit entry for a weekday, replacing any previous one.
    pub fn set(&mut self, weekday: Weekday, working: bool, day_type: DayType) {
        self.days[slot_index(weekday)] = Some(ScheduleEntry { working, day_type });
    }

    /// Builder-style variant of [`WeeklySchedule::set`].
    #[must_use]
    pub fn with(mut self, weekday: Weekday, working: bool, day_type: DayType) -> Self {
        self.set(weekday, working, day_type);
        self
    }

    /// Returns the explicit entry for a weekday, if any.
    #[must_use]
    pub fn explicit(&self, weekday: Weekday) -> Option<ScheduleEntry> {
        self.days[slot_index(weekday)]
    }

    /// Resolves a weekday, applying the default policy when no row exists.
    #[must_use]
    pub fn resolve(&self, weekday: Weekday) -> ScheduleEntry {
        self.explicit(weekday).unwrap_or_else(|| default_entry(weekday))
    }

    /// Expands the schedule into seven explicit rows, defaults included.
    /// This is the shape written back when an employee's schedule is saved.
    #[must_use]
    pub fn to_rows(&self, employee_id: EmployeeId) -> Vec<WorkScheduleDay> {
        ALL_WEEKDAYS
            .iter()
            .map(|&weekday| {
                let entry = self.resolve(weekday);
                WorkScheduleDay {
                    employee_id,
                    weekday,
                    working: entry.working,
                    day_type: entry.day_type,
                }
            })
            .collect()
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn slot_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

fn default_entry(weekday: Weekday) -> ScheduleEntry {
    ScheduleEntry {
        working: weekday.num_days_from_monday() < 5,
        day_type: DayType::Full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(Weekday::Mon, true)]
    #[case(Weekday::Wed, true)]
    #[case(Weekday::Fri, true)]
    #[case(Weekday::Sat, false)]
    #[case(Weekday::Sun, false)]
    fn test_default_policy(#[case] weekday: Weekday, #[case] working: bool) {
        let entry = WeeklySchedule::new().resolve(weekday);
        assert_eq!(entry.working, working);
        assert_eq!(entry.day_type, DayType::Full);
    }

    #[test]
    fn test_explicit_row_overrides_default() {
        let schedule = WeeklySchedule::new()
            .with(Weekday::Sat, true, DayType::Half)
            .with(Weekday::Mon, false, DayType::Full);

        assert_eq!(
            schedule.resolve(Weekday::Sat),
            ScheduleEntry { working: true, day_type: DayType::Half }
        );
        assert!(!schedule.resolve(Weekday::Mon).working);
        // Untouched weekdays keep the default
        assert!(schedule.resolve(Weekday::Tue).working);
        assert!(schedule.explicit(Weekday::Tue).is_none());
    }

    #[test]
    fn test_from_rows_rejects_duplicate_weekday() {
        let employee_id = EmployeeId::new();
        let row = WorkScheduleDay {
            employee_id,
            weekday: Weekday::Thu,
            working: true,
            day_type: DayType::Full,
        };
        let result = WeeklySchedule::from_rows(&[row.clone(), row]);
        assert_eq!(result, Err(CalendarError::DuplicateWeekday(Weekday::Thu)));
    }

    #[test]
    fn test_to_rows_expands_defaults() {
        let employee_id = EmployeeId::new();
        let rows = WeeklySchedule::new()
            .with(Weekday::Sat, true, DayType::Half)
            .to_rows(employee_id);

        assert_eq!(rows.len(), 7);
        assert_eq!(rows.iter().filter(|r| r.working).count(), 6);
        let rebuilt = WeeklySchedule::from_rows(&rows).unwrap();
        assert_eq!(rebuilt.resolve(Weekday::Sat).day_type, DayType::Half);
    }

    #[test]
    fn test_weekday_index_conversion() {
        assert_eq!(weekday_from_index(0), Ok(Weekday::Mon));
        assert_eq!(weekday_from_index(6), Ok(Weekday::Sun));
        assert_eq!(weekday_from_index(7), Err(CalendarError::InvalidWeekday(7)));
        assert_eq!(weekday_from_index(-1), Err(CalendarError::InvalidWeekday(-1)));
        assert_eq!(weekday_index(Weekday::Fri), 4);
    }

    #[test]
    fn test_day_type_weight_and_parse() {
        assert_eq!(DayType::Full.weight(), dec!(1));
        assert_eq!(DayType::Half.weight(), dec!(0.5));
        assert_eq!(DayType::parse_lenient("half"), DayType::Half);
        assert_eq!(DayType::parse_lenient("Full"), DayType::Full);
        assert_eq!(DayType::parse_lenient(""), DayType::Full);
    }
}
