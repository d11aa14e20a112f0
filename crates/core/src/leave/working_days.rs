//! Working-day calculator.
//!
//! Counts how many working days a half-day-aware date range consumes for one
//! employee. Every date from start to end contributes:
//!
//! - 0 if the schedule marks its weekday as non-working or it is a full holiday;
//! - otherwise 1.0 for a full day or 0.5 for a half day, minus 0.5 when the
//!   range starts on it in the afternoon, minus 0.5 when the range ends on it
//!   in the morning, minus 0.5 for a half-day holiday;
//! - never less than 0.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::types::{DateSpan, HalfDay};
use crate::calendar::{CalendarPolicy, HolidayCalendar, HolidayKind, WeeklySchedule};

fn half() -> Decimal {
    Decimal::new(5, 1)
}

/// Working days consumed by `start`/`start_half` through `end`/`end_half`.
///
/// Returns zero when `end < start`; callers that need to tell an invalid
/// range apart from an empty one validate with [`DateSpan::new`] first.
#[must_use]
pub fn working_days(
    schedule: &WeeklySchedule,
    holidays: &HolidayCalendar,
    start: NaiveDate,
    start_half: HalfDay,
    end: NaiveDate,
    end_half: HalfDay,
) -> Decimal {
    if end < start {
        return Decimal::ZERO;
    }
    let span = DateSpan {
        start,
        start_half,
        end,
        end_half,
    };
    daily_breakdown(schedule, holidays, &span)
        .map(|(_, days)| days)
        .sum()
}

/// Working days consumed by a validated span under an employee's calendar.
#[must_use]
pub fn span_working_days(policy: &CalendarPolicy, span: &DateSpan) -> Decimal {
    working_days(
        &policy.schedule,
        &policy.holidays,
        span.start,
        span.start_half,
        span.end,
        span.end_half,
    )
}

/// Per-date contributions of a span, in date order. Used for previews.
pub fn daily_breakdown<'a>(
    schedule: &'a WeeklySchedule,
    holidays: &'a HolidayCalendar,
    span: &'a DateSpan,
) -> impl Iterator<Item = (NaiveDate, Decimal)> + 'a {
    span.start
        .iter_days()
        .take_while(move |date| *date <= span.end)
        .map(move |date| (date, day_contribution(schedule, holidays, span, date)))
}

fn day_contribution(
    schedule: &WeeklySchedule,
    holidays: &HolidayCalendar,
    span: &DateSpan,
    date: NaiveDate,
) -> Decimal {
    let entry = schedule.resolve(date.weekday());
    if !entry.working {
        return Decimal::ZERO;
    }

    let mut days = entry.day_type.weight();
    match holidays.kind_on(date) {
        Some(HolidayKind::Full) => return Decimal::ZERO,
        Some(HolidayKind::Half) => days -= HolidayKind::Half.weight(),
        None => {}
    }
    if date == span.start && span.start_half == HalfDay::Pm {
        days -= half();
    }
    if date == span.end && span.end_half == HalfDay::Am {
        days -= half();
    }
    days.max(Decimal::ZERO)
}
