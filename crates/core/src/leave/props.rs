//! Property-based tests for the working-day calculator and balances.

use chrono::{Duration, NaiveDate, Utc, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use leavebook_shared::types::{EmployeeId, TenantId};

use super::balance::BalanceEngine;
use super::book::TenantLeaveBook;
use super::service::LeaveService;
use super::types::{Employee, HalfDay, NewLeaveAdjustment};
use super::working_days::working_days;
use crate::calendar::{DayType, HolidayCalendar, HolidayKind, WeeklySchedule};
use crate::entitlement::EntitlementTable;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn half_day() -> impl Strategy<Value = HalfDay> {
    prop_oneof![Just(HalfDay::Am), Just(HalfDay::Pm)]
}

fn day_type() -> impl Strategy<Value = DayType> {
    prop_oneof![Just(DayType::Full), Just(DayType::Half)]
}

/// An explicit schedule for all seven weekdays.
fn schedule() -> impl Strategy<Value = WeeklySchedule> {
    prop::collection::vec((any::<bool>(), day_type()), 7).prop_map(|days| {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        weekdays
            .into_iter()
            .zip(days)
            .fold(WeeklySchedule::new(), |s, (weekday, (working, day_type))| {
                s.with(weekday, working, day_type)
            })
    })
}

fn holidays() -> impl Strategy<Value = HolidayCalendar> {
    prop::collection::vec((0i64..120, any::<bool>()), 0..20).prop_map(|entries| {
        let mut calendar = HolidayCalendar::new();
        for (offset, full) in entries {
            let kind = if full { HolidayKind::Full } else { HolidayKind::Half };
            calendar.insert(base_date() + Duration::days(offset), kind);
        }
        calendar
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The count is in half-day steps, never negative and never more than
    /// one per calendar day.
    #[test]
    fn prop_working_days_bounded(
        schedule in schedule(),
        holidays in holidays(),
        start_offset in 0i64..90,
        len in 0i64..30,
        start_half in half_day(),
        end_half in half_day(),
    ) {
        let start = base_date() + Duration::days(start_offset);
        let end = start + Duration::days(len);
        let days = working_days(&schedule, &holidays, start, start_half, end, end_half);

        prop_assert!(days >= Decimal::ZERO);
        prop_assert!(days <= Decimal::from(len + 1));
        prop_assert!((days * Decimal::TWO).fract().is_zero());
    }

    /// A reversed range counts zero.
    #[test]
    fn prop_reversed_range_is_zero(
        schedule in schedule(),
        start_offset in 1i64..90,
        back in 1i64..30,
    ) {
        let start = base_date() + Duration::days(start_offset);
        let end = start - Duration::days(back);
        let days = working_days(
            &schedule,
            &HolidayCalendar::new(),
            start,
            HalfDay::Am,
            end,
            HalfDay::Pm,
        );
        prop_assert_eq!(days, Decimal::ZERO);
    }

    /// Splitting a whole-day range at any date gives the same total.
    #[test]
    fn prop_whole_day_ranges_are_additive(
        schedule in schedule(),
        holidays in holidays(),
        start_offset in 0i64..60,
        first_len in 0i64..20,
        second_len in 0i64..20,
    ) {
        let start = base_date() + Duration::days(start_offset);
        let mid = start + Duration::days(first_len);
        let end = mid + Duration::days(1 + second_len);

        let whole = working_days(&schedule, &holidays, start, HalfDay::Am, end, HalfDay::Pm);
        let left = working_days(&schedule, &holidays, start, HalfDay::Am, mid, HalfDay::Pm);
        let right = working_days(
            &schedule,
            &holidays,
            mid + Duration::days(1),
            HalfDay::Am,
            end,
            HalfDay::Pm,
        );

        prop_assert_eq!(whole, left + right);
    }

    /// Snapshot balances satisfy remaining = entitled - used + adjusted.
    #[test]
    fn prop_balance_identity(
        seed_days in 0i64..40,
        deltas in prop::collection::vec(-20i64..=20, 0..10),
        as_of_offset in 0i64..3_000,
    ) {
        let tenant_id = TenantId::new();
        let mut book = TenantLeaveBook::new(tenant_id);
        let employee = Employee {
            id: EmployeeId::new(),
            tenant_id,
            code: "E001".to_string(),
            full_name: "Prop".to_string(),
            join_date: Some(base_date()),
            exit_date: None,
            holiday_group: String::new(),
        };
        let employee_id = employee.id;
        book.insert_employee(employee);
        book.insert_table(EntitlementTable::seeded("Annual Leave", Decimal::from(seed_days)));

        for (i, halves) in deltas.iter().enumerate() {
            let adj = LeaveService::prepare_adjustment(
                tenant_id,
                NewLeaveAdjustment {
                    employee_id,
                    leave_type: "Annual Leave".to_string(),
                    date: base_date() + Duration::days(i64::try_from(i).unwrap()),
                    delta_days: Decimal::new(halves * 5, 1),
                    remarks: String::new(),
                },
                "Annual Leave",
                Utc::now(),
            )
            .unwrap();
            book.record_adjustment(adj);
        }

        let engine = BalanceEngine::new(&book);
        let employee = book.employee(employee_id).unwrap();
        let as_of = base_date() + Duration::days(as_of_offset);

        let balance = engine.balance(employee, "Annual Leave", as_of);
        prop_assert_eq!(balance.remaining, balance.entitled - balance.used + balance.adjusted);
        prop_assert_eq!(balance.entitled, Decimal::from(seed_days));

        let running = engine.running_balance(employee, "Annual Leave", as_of);
        prop_assert_eq!(running.remaining, running.entitled - running.used + running.adjusted);
        // Reset policy: nothing is ever carried.
        prop_assert_eq!(running.carried_in, Decimal::ZERO);
    }
}
