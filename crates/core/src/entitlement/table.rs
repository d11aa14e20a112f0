//! Tenant-wide entitlement tables, one per leave type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::service_year::ServiceYear;

/// Year-end handling of unused days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarryPolicy {
    /// Unused balance is forfeited at the service-year boundary.
    #[default]
    Reset,
    /// Unused balance is brought forward into the next service year.
    Bring,
}

/// Carry-forward rule for one leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarryRule {
    /// Reset or bring forward.
    pub policy: CarryPolicy,
    /// Whether `limit` caps the amount brought forward.
    pub limit_enabled: bool,
    /// Maximum days brought forward when `limit_enabled` is set.
    pub limit: Decimal,
}

impl CarryRule {
    /// Forfeit everything at year end.
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            policy: CarryPolicy::Reset,
            limit_enabled: false,
            limit: Decimal::ZERO,
        }
    }

    /// Bring the whole balance forward.
    #[must_use]
    pub const fn bring_unlimited() -> Self {
        Self {
            policy: CarryPolicy::Bring,
            limit_enabled: false,
            limit: Decimal::ZERO,
        }
    }

    /// Bring the balance forward, capped at `limit` days. Negative limits are treated as zero.
    #[must_use]
    pub fn bring_capped(limit: Decimal) -> Self {
        Self {
            policy: CarryPolicy::Bring,
            limit_enabled: true,
            limit: limit.max(Decimal::ZERO),
        }
    }
}

/// Entitled days for each of the fifty service-year bands.
///
/// Stored as a fixed array indexed by `ServiceYear::index`; bands never set are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Decimal>", try_from = "Vec<Decimal>")]
pub struct YearTable([Decimal; ServiceYear::COUNT]);

impl From<YearTable> for Vec<Decimal> {
    fn from(table: YearTable) -> Self {
        table.0.to_vec()
    }
}

impl TryFrom<Vec<Decimal>> for YearTable {
    type Error = String;

    fn try_from(days: Vec<Decimal>) -> Result<Self, Self::Error> {
        let len = days.len();
        <[Decimal; ServiceYear::COUNT]>::try_from(days)
            .map(Self)
            .map_err(|_| format!("expected {} service-year bands, got {len}", ServiceYear::COUNT))
    }
}

impl Default for YearTable {
    fn default() -> Self {
        Self::zeros()
    }
}

impl YearTable {
    /// Every band zero.
    #[must_use]
    pub const fn zeros() -> Self {
        Self([Decimal::ZERO; ServiceYear::COUNT])
    }

    /// Every band set to `days`.
    #[must_use]
    pub const fn uniform(days: Decimal) -> Self {
        Self([days; ServiceYear::COUNT])
    }

    /// Days for a band.
    #[must_use]
    pub fn get(&self, year: ServiceYear) -> Decimal {
        self.0[year.index()]
    }

    /// Sets the days for a band.
    pub fn set(&mut self, year: ServiceYear, days: Decimal) {
        self.0[year.index()] = days;
    }

    /// Builder-style variant of [`YearTable::set`].
    #[must_use]
    pub fn with(mut self, year: ServiceYear, days: Decimal) -> Self {
        self.set(year, days);
        self
    }

    /// Bands and their days, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (ServiceYear, Decimal)> + '_ {
        ServiceYear::all().map(|year| (year, self.get(year)))
    }
}

/// A tenant's entitlement table for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementTable {
    /// Leave type name (e.g. "Annual Leave").
    pub leave_type: String,
    /// Whether consumers should pro-rate first/last-year entitlement.
    /// Passed through untouched; the engine never applies a pro-rating formula.
    pub prorated: bool,
    /// Year-end handling.
    pub carry: CarryRule,
    /// Days per service-year band.
    pub years: YearTable,
}

impl EntitlementTable {
    /// Creates a table with every band zero and the reset policy.
    #[must_use]
    pub fn new(leave_type: impl Into<String>) -> Self {
        Self {
            leave_type: leave_type.into(),
            prorated: false,
            carry: CarryRule::reset(),
            years: YearTable::zeros(),
        }
    }

    /// Creates the table written when a leave type is first configured:
    /// every band gets `days_per_year`, not pro-rated, reset at year end.
    #[must_use]
    pub fn seeded(leave_type: impl Into<String>, days_per_year: Decimal) -> Self {
        Self {
            years: YearTable::uniform(days_per_year),
            ..Self::new(leave_type)
        }
    }

    /// Days entitled in a band.
    #[must_use]
    pub fn entitled_days(&self, year: ServiceYear) -> Decimal {
        self.years.get(year)
    }

    /// The legacy `yearly_reset` flag kept alongside the table.
    #[must_use]
    pub fn yearly_reset(&self) -> bool {
        self.carry.policy == CarryPolicy::Reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_bands_are_zero() {
        let table = EntitlementTable::new("Annual Leave");
        assert_eq!(table.entitled_days(ServiceYear::FIRST), dec!(0));
        assert_eq!(table.entitled_days(ServiceYear::LAST), dec!(0));
    }

    #[test]
    fn test_seeded_table() {
        let table = EntitlementTable::seeded("Annual Leave", dec!(14));
        assert!(ServiceYear::all().all(|y| table.entitled_days(y) == dec!(14)));
        assert!(!table.prorated);
        assert!(table.yearly_reset());
    }

    #[test]
    fn test_year_table_set_and_iter() {
        let years = YearTable::zeros()
            .with(ServiceYear::clamped(1), dec!(7))
            .with(ServiceYear::clamped(5), dec!(18.5));
        assert_eq!(years.get(ServiceYear::clamped(5)), dec!(18.5));
        assert_eq!(years.iter().filter(|(_, d)| !d.is_zero()).count(), 2);
    }

    #[test]
    fn test_bring_capped_floors_negative_limit() {
        let rule = CarryRule::bring_capped(dec!(-3));
        assert_eq!(rule.limit, dec!(0));
        assert!(rule.limit_enabled);
    }
}
