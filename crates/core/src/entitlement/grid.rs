//! Per-employee entitlement overrides.
//!
//! Each employee may carry a materialized grid of 50 bands per leave type.
//! A value present in the grid takes precedence over the tenant table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use leavebook_shared::types::EmployeeId;

use super::service_year::ServiceYear;
use super::table::EntitlementTable;

/// One stored override row; (employee, year, leave type) is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveEntitlement {
    /// Employee the row belongs to.
    pub employee_id: EmployeeId,
    /// Service-year band.
    pub year_of_service: ServiceYear,
    /// Leave type name.
    pub leave_type: String,
    /// Entitled days.
    pub days: Decimal,
}

type Bands = [Option<Decimal>; ServiceYear::COUNT];

/// An employee's entitlement grid: leave type × 50 bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementGrid {
    employee_id: EmployeeId,
    by_type: BTreeMap<String, Bands>,
}

impl EntitlementGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            by_type: BTreeMap::new(),
        }
    }

    /// Builds a grid from stored rows. Rows for other employees are skipped.
    #[must_use]
    pub fn from_rows<'a, I>(employee_id: EmployeeId, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaveEntitlement>,
    {
        let mut grid = Self::new(employee_id);
        for row in rows.into_iter().filter(|r| r.employee_id == employee_id) {
            grid.set(&row.leave_type, row.year_of_service, row.days);
        }
        grid
    }

    /// Copies every band of every tenant table into a fresh grid.
    ///
    /// This is the explicit "load defaults" operation: the result replaces
    /// whatever the employee had, including leave types with no table.
    /// Running it twice gives the same grid.
    #[must_use]
    pub fn load_defaults<'a, I>(employee_id: EmployeeId, tables: I) -> Self
    where
        I: IntoIterator<Item = &'a EntitlementTable>,
    {
        let mut grid = Self::new(employee_id);
        for table in tables {
            let bands = grid.bands_mut(&table.leave_type);
            for (year, days) in table.years.iter() {
                bands[year.index()] = Some(days);
            }
        }
        grid
    }

    /// The employee this grid belongs to.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Sets one band.
    pub fn set(&mut self, leave_type: &str, year: ServiceYear, days: Decimal) {
        self.bands_mut(leave_type)[year.index()] = Some(days);
    }

    /// The override for a band, if one is stored.
    #[must_use]
    pub fn get(&self, leave_type: &str, year: ServiceYear) -> Option<Decimal> {
        self.by_type
            .get(leave_type)
            .and_then(|bands| bands[year.index()])
    }

    /// Leave types present in the grid, sorted.
    pub fn leave_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    /// Returns true if no band is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Flattens the grid into stored rows, ordered by leave type then band.
    #[must_use]
    pub fn to_rows(&self) -> Vec<LeaveEntitlement> {
        let employee_id = self.employee_id;
        self.by_type
            .iter()
            .flat_map(|(leave_type, bands)| {
                ServiceYear::all().filter_map(move |year| {
                    bands[year.index()].map(|days| LeaveEntitlement {
                        employee_id,
                        year_of_service: year,
                        leave_type: leave_type.clone(),
                        days,
                    })
                })
            })
            .collect()
    }

    fn bands_mut(&mut self, leave_type: &str) -> &mut Bands {
        self.by_type
            .entry(leave_type.to_string())
            .or_insert([None; ServiceYear::COUNT])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::table::YearTable;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_defaults_fills_fifty_bands_per_type() {
        let employee_id = EmployeeId::new();
        let annual = EntitlementTable::seeded("Annual Leave", dec!(14));
        let mut sick = EntitlementTable::new("Sick Leave");
        sick.years = YearTable::uniform(dec!(7)).with(ServiceYear::clamped(10), dec!(10));

        let grid = EntitlementGrid::load_defaults(employee_id, [&annual, &sick]);
        let rows = grid.to_rows();

        assert_eq!(rows.len(), 100);
        assert_eq!(grid.get("Annual Leave", ServiceYear::LAST), Some(dec!(14)));
        assert_eq!(grid.get("Sick Leave", ServiceYear::clamped(10)), Some(dec!(10)));
        assert_eq!(grid.get("Sick Leave", ServiceYear::clamped(9)), Some(dec!(7)));
        assert_eq!(grid.leave_types().collect::<Vec<_>>(), vec!["Annual Leave", "Sick Leave"]);
    }

    #[test]
    fn test_load_defaults_is_idempotent_and_overwrites() {
        let employee_id = EmployeeId::new();
        let annual = EntitlementTable::seeded("Annual Leave", dec!(14));

        let mut edited = EntitlementGrid::new(employee_id);
        edited.set("Annual Leave", ServiceYear::FIRST, dec!(30));
        edited.set("Legacy Leave", ServiceYear::FIRST, dec!(3));

        let first = EntitlementGrid::load_defaults(employee_id, [&annual]);
        let second = EntitlementGrid::load_defaults(employee_id, [&annual]);
        assert_eq!(first, second);
        assert_eq!(first.get("Annual Leave", ServiceYear::FIRST), Some(dec!(14)));
        assert_eq!(first.get("Legacy Leave", ServiceYear::FIRST), None);
    }

    #[test]
    fn test_from_rows_skips_other_employees() {
        let mine = EmployeeId::new();
        let theirs = EmployeeId::new();
        let rows = vec![
            LeaveEntitlement {
                employee_id: mine,
                year_of_service: ServiceYear::clamped(2),
                leave_type: "Annual Leave".to_string(),
                days: dec!(15),
            },
            LeaveEntitlement {
                employee_id: theirs,
                year_of_service: ServiceYear::clamped(2),
                leave_type: "Annual Leave".to_string(),
                days: dec!(99),
            },
        ];

        let grid = EntitlementGrid::from_rows(mine, &rows);
        assert_eq!(grid.get("Annual Leave", ServiceYear::clamped(2)), Some(dec!(15)));
        assert_eq!(grid.get("Annual Leave", ServiceYear::FIRST), None);
        assert_eq!(grid.to_rows().len(), 1);
    }
}
