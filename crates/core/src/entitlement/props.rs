//! Property-based tests for service-year resolution and carry-forward.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::carry::carry_forward;
use super::service_year::ServiceYear;
use super::table::CarryRule;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

/// Half-day quantities between -100 and 100 days.
fn half_days() -> impl Strategy<Value = Decimal> {
    (-200i64..=200i64).prop_map(|halves| Decimal::new(halves * 5, 1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Advancing the reference date never lowers the band, and the band stays in 1..=50.
    #[test]
    fn prop_resolve_monotonic_and_bounded(
        join_offset in 0i64..30_000,
        first in 0i64..30_000,
        step in 0i64..5_000,
    ) {
        let joined = base_date() + Duration::days(join_offset);
        let earlier = joined + Duration::days(first);
        let later = earlier + Duration::days(step);

        let a = ServiceYear::resolve(Some(joined), earlier);
        let b = ServiceYear::resolve(Some(joined), later);

        prop_assert!(a <= b);
        prop_assert!((1..=50).contains(&a.get()));
        prop_assert!((1..=50).contains(&b.get()));
    }

    /// Without a join date the band is always 1.
    #[test]
    fn prop_resolve_without_join_date(offset in -30_000i64..30_000) {
        let reference = base_date() + Duration::days(offset);
        prop_assert_eq!(ServiceYear::resolve(None, reference), ServiceYear::FIRST);
    }

    /// Capped carry never exceeds the limit and never raises a deficit.
    #[test]
    fn prop_capped_carry_bounds(prior in half_days(), limit in 0i64..=40) {
        let limit = Decimal::from(limit);
        let carried = carry_forward(&CarryRule::bring_capped(limit), prior);

        prop_assert!(carried <= limit);
        prop_assert!(carried <= prior);
        if prior < Decimal::ZERO {
            prop_assert_eq!(carried, prior);
        }
    }

    /// Reset always forfeits.
    #[test]
    fn prop_reset_forfeits(prior in half_days()) {
        prop_assert_eq!(carry_forward(&CarryRule::reset(), prior), Decimal::ZERO);
    }
}
