//! Tenant holiday calendar, partitioned by holiday group.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use leavebook_shared::types::{HolidayId, TenantId};

/// How much of the date the holiday covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HolidayKind {
    /// Half-day holiday: removes 0.5 day from the date.
    Half,
    /// Whole-day holiday: the date consumes nothing.
    Full,
}

impl HolidayKind {
    /// Builds the kind from the stored `is_half_day` flag.
    #[must_use]
    pub const fn from_half_day_flag(is_half_day: bool) -> Self {
        if is_half_day { Self::Half } else { Self::Full }
    }

    /// Days removed from a working date by this holiday.
    #[must_use]
    pub fn weight(self) -> Decimal {
        match self {
            Self::Full => Decimal::ONE,
            Self::Half => Decimal::new(5, 1),
        }
    }
}

/// A stored holiday row; (tenant, group, date) is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Row identifier.
    pub id: HolidayId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Holiday group shared by the employees it applies to (may be empty).
    pub group_code: String,
    /// Display name.
    pub name: String,
    /// The calendar date.
    pub date: NaiveDate,
    /// Full or half day.
    pub kind: HolidayKind,
}

/// The holiday dates that apply to one holiday group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    dates: BTreeMap<NaiveDate, HolidayKind>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the holidays of one group.
    #[must_use]
    pub fn for_group<'a, I>(holidays: I, group_code: &str) -> Self
    where
        I: IntoIterator<Item = &'a Holiday>,
    {
        let mut calendar = Self::new();
        for holiday in holidays {
            if holiday.group_code == group_code {
                calendar.insert(holiday.date, holiday.kind);
            }
        }
        calendar
    }

    /// Marks a date as a holiday. When the same date is inserted twice the
    /// wider holiday (full over half) is kept.
    pub fn insert(&mut self, date: NaiveDate, kind: HolidayKind) {
        self.dates
            .entry(date)
            .and_modify(|existing| *existing = (*existing).max(kind))
            .or_insert(kind);
    }

    /// Returns the holiday kind on a date, if it is a holiday.
    #[must_use]
    pub fn kind_on(&self, date: NaiveDate) -> Option<HolidayKind> {
        self.dates.get(&date).copied()
    }

    /// Returns true if the date is a holiday of any kind.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    /// Number of holiday dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if there are no holidays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    /// Builds a calendar of full-day holidays.
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        let mut calendar = Self::new();
        for date in iter {
            calendar.insert(date, HolidayKind::Full);
        }
        calendar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(tenant_id: TenantId, group: &str, on: NaiveDate, kind: HolidayKind) -> Holiday {
        Holiday {
            id: HolidayId::new(),
            tenant_id,
            group_code: group.to_string(),
            name: "Holiday".to_string(),
            date: on,
            kind,
        }
    }

    #[test]
    fn test_for_group_filters_other_groups() {
        let tenant_id = TenantId::new();
        let rows = vec![
            holiday(tenant_id, "SG", date(2024, 8, 9), HolidayKind::Full),
            holiday(tenant_id, "MY", date(2024, 8, 31), HolidayKind::Full),
            holiday(tenant_id, "", date(2024, 12, 25), HolidayKind::Full),
        ];

        let sg = HolidayCalendar::for_group(&rows, "SG");
        assert_eq!(sg.len(), 1);
        assert!(sg.contains(date(2024, 8, 9)));
        assert!(!sg.contains(date(2024, 8, 31)));

        // The empty group is a group like any other
        let blank = HolidayCalendar::for_group(&rows, "");
        assert_eq!(blank.len(), 1);
        assert!(blank.contains(date(2024, 12, 25)));
    }

    #[test]
    fn test_full_wins_over_half_on_same_date() {
        let mut calendar = HolidayCalendar::new();
        calendar.insert(date(2024, 12, 24), HolidayKind::Half);
        calendar.insert(date(2024, 12, 24), HolidayKind::Full);
        calendar.insert(date(2024, 12, 24), HolidayKind::Half);
        assert_eq!(calendar.kind_on(date(2024, 12, 24)), Some(HolidayKind::Full));
    }
}
