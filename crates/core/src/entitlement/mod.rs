//! Leave entitlement: service-year bands, tenant tables, per-employee
//! overrides and the year-end carry-forward policy.

pub mod carry;
pub mod error;
pub mod grid;
pub mod service_year;
pub mod stored;
pub mod table;

#[cfg(test)]
mod props;

pub use carry::carry_forward;
pub use error::EntitlementError;
pub use grid::{EntitlementGrid, LeaveEntitlement};
pub use service_year::ServiceYear;
pub use stored::StoredLeaveDefault;
pub use table::{CarryPolicy, CarryRule, EntitlementTable, YearTable};

use rust_decimal::Decimal;

/// Days entitled for one band: the employee override if present, else the
/// tenant table, else zero. Missing configuration never raises.
#[must_use]
pub fn entitled_days(
    grid: Option<&EntitlementGrid>,
    table: Option<&EntitlementTable>,
    leave_type: &str,
    year: ServiceYear,
) -> Decimal {
    grid.and_then(|g| g.get(leave_type, year))
        .or_else(|| table.map(|t| t.entitled_days(year)))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leavebook_shared::types::EmployeeId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_override_takes_precedence() {
        let table = EntitlementTable::seeded("Annual Leave", dec!(14));
        let mut grid = EntitlementGrid::new(EmployeeId::new());
        grid.set("Annual Leave", ServiceYear::clamped(3), dec!(20));

        let year3 = ServiceYear::clamped(3);
        let year4 = ServiceYear::clamped(4);
        assert_eq!(entitled_days(Some(&grid), Some(&table), "Annual Leave", year3), dec!(20));
        assert_eq!(entitled_days(Some(&grid), Some(&table), "Annual Leave", year4), dec!(14));
    }

    #[test]
    fn test_missing_configuration_is_zero() {
        assert_eq!(entitled_days(None, None, "Annual Leave", ServiceYear::FIRST), dec!(0));
        let grid = EntitlementGrid::new(EmployeeId::new());
        assert_eq!(entitled_days(Some(&grid), None, "Annual Leave", ServiceYear::FIRST), dec!(0));
    }
}
