//! Year-end carry-forward policy.

use rust_decimal::Decimal;

use super::table::{CarryPolicy, CarryRule};

/// Days carried from a finished service year into the next one.
///
/// `Reset` forfeits everything. `Bring` carries the whole prior balance,
/// or at most `limit` days when the limit is enabled. Only the upper bound is
/// capped: a negative prior balance carries forward as a deficit.
#[must_use]
pub fn carry_forward(rule: &CarryRule, prior_year_balance: Decimal) -> Decimal {
    match rule.policy {
        CarryPolicy::Reset => Decimal::ZERO,
        CarryPolicy::Bring if rule.limit_enabled => prior_year_balance.min(rule.limit),
        CarryPolicy::Bring => prior_year_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(CarryRule::reset(), dec!(7.5), dec!(0))]
    #[case(CarryRule::reset(), dec!(-2), dec!(0))]
    #[case(CarryRule::bring_unlimited(), dec!(7.5), dec!(7.5))]
    #[case(CarryRule::bring_unlimited(), dec!(-2), dec!(-2))]
    #[case(CarryRule::bring_capped(dec!(5)), dec!(7.5), dec!(5))]
    #[case(CarryRule::bring_capped(dec!(5)), dec!(3), dec!(3))]
    #[case(CarryRule::bring_capped(dec!(5)), dec!(-2), dec!(-2))]
    #[case(CarryRule::bring_capped(dec!(0)), dec!(4), dec!(0))]
    fn test_carry_forward(#[case] rule: CarryRule, #[case] prior: Decimal, #[case] expected: Decimal) {
        assert_eq!(carry_forward(&rule, prior), expected);
    }

    #[test]
    fn test_disabled_limit_is_ignored() {
        let rule = CarryRule {
            policy: CarryPolicy::Bring,
            limit_enabled: false,
            limit: dec!(1),
        };
        assert_eq!(carry_forward(&rule, dec!(9)), dec!(9));
    }
}
