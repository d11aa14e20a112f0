//! Balance engine.
//!
//! Two modes:
//!
//! - [`BalanceEngine::balance`] is a snapshot for the employee's current
//!   service year: entitlement for that band minus every approved application
//!   plus every adjustment of the leave type. Nothing is carried in.
//! - [`BalanceEngine::running_balance`] walks bands 1 through the current one.
//!   Each application is attributed to the band its start date falls in and
//!   each adjustment to the band of its date; anything dated after `as_of`
//!   lands in the current band. The remaining balance of one band is carried
//!   into the next under the leave type's carry rule.

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use leavebook_shared::types::EmployeeId;

use super::book::TenantLeaveBook;
use super::types::Employee;
use crate::entitlement::{CarryRule, ServiceYear, carry_forward};

/// Balance of one leave type for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Employee.
    pub employee_id: EmployeeId,
    /// Leave type name.
    pub leave_type: String,
    /// Date the balance was evaluated at.
    pub as_of: NaiveDate,
    /// Service-year band at `as_of`.
    pub service_year: ServiceYear,
    /// Days entitled for the band, including `carried_in`.
    pub entitled: Decimal,
    /// Days carried from the previous band.
    pub carried_in: Decimal,
    /// Approved days used.
    pub used: Decimal,
    /// Net adjustments.
    pub adjusted: Decimal,
    /// `entitled - used + adjusted`.
    pub remaining: Decimal,
    /// Informational prorate flag of the leave type.
    pub prorated: bool,
}

/// One row of the tenant summary grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Employee code.
    pub employee_code: String,
    /// Employee display name.
    pub employee_name: String,
    /// Balance details.
    #[serde(flatten)]
    pub balance: LeaveBalance,
}

/// Options for [`BalanceEngine::summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Skip employees who had exited by `as_of`.
    pub active_only: bool,
    /// Use [`BalanceEngine::running_balance`] instead of the snapshot.
    pub running: bool,
}

/// Computes balances from a loaded [`TenantLeaveBook`].
#[derive(Debug, Clone, Copy)]
pub struct BalanceEngine<'a> {
    book: &'a TenantLeaveBook,
}

impl<'a> BalanceEngine<'a> {
    /// Creates an engine over a book.
    #[must_use]
    pub const fn new(book: &'a TenantLeaveBook) -> Self {
        Self { book }
    }

    fn prorated(&self, leave_type: &str) -> bool {
        self.book.table(leave_type).is_some_and(|t| t.prorated)
    }

    fn carry_rule(&self, leave_type: &str) -> CarryRule {
        self.book
            .table(leave_type)
            .map(|t| t.carry)
            .unwrap_or_default()
    }

    /// Snapshot balance for the service year `as_of` falls in.
    #[must_use]
    pub fn balance(&self, employee: &Employee, leave_type: &str, as_of: NaiveDate) -> LeaveBalance {
        let service_year = ServiceYear::resolve(employee.join_date, as_of);
        let entitled = self.book.entitled_days(employee.id, leave_type, service_year);

        let used: Decimal = self
            .book
            .applications_for(employee.id, leave_type)
            .filter(|a| a.status.consumes_balance())
            .map(|a| a.days_used)
            .sum();
        let adjusted: Decimal = self
            .book
            .adjustments_for(employee.id, leave_type)
            .map(|a| a.delta_days)
            .sum();
        let remaining = entitled - used + adjusted;

        debug!(
            employee_id = %employee.id,
            leave_type,
            service_year = %service_year,
            %entitled,
            %used,
            %adjusted,
            %remaining,
            "computed leave balance"
        );

        LeaveBalance {
            employee_id: employee.id,
            leave_type: leave_type.to_string(),
            as_of,
            service_year,
            entitled,
            carried_in: Decimal::ZERO,
            used,
            adjusted,
            remaining,
            prorated: self.prorated(leave_type),
        }
    }

    /// Multi-year balance with carry-forward between bands.
    #[must_use]
    pub fn running_balance(
        &self,
        employee: &Employee,
        leave_type: &str,
        as_of: NaiveDate,
    ) -> LeaveBalance {
        let current = ServiceYear::resolve(employee.join_date, as_of);
        let band_of = |date: NaiveDate| ServiceYear::resolve(employee.join_date, date).min(current);

        let mut used = [Decimal::ZERO; ServiceYear::COUNT];
        for application in self
            .book
            .applications_for(employee.id, leave_type)
            .filter(|a| a.status.consumes_balance())
        {
            used[band_of(application.span.start).index()] += application.days_used;
        }
        let mut adjusted = [Decimal::ZERO; ServiceYear::COUNT];
        for adjustment in self.book.adjustments_for(employee.id, leave_type) {
            adjusted[band_of(adjustment.date).index()] += adjustment.delta_days;
        }

        let rule = self.carry_rule(leave_type);
        let mut carried_in = Decimal::ZERO;
        let mut entitled = Decimal::ZERO;
        let mut remaining = Decimal::ZERO;
        for year in current.up_to() {
            carried_in = if year.previous().is_some() {
                carry_forward(&rule, remaining)
            } else {
                Decimal::ZERO
            };
            entitled = self.book.entitled_days(employee.id, leave_type, year) + carried_in;
            remaining = entitled - used[year.index()] + adjusted[year.index()];
        }

        debug!(
            employee_id = %employee.id,
            leave_type,
            service_year = %current,
            %carried_in,
            %remaining,
            "computed running leave balance"
        );

        LeaveBalance {
            employee_id: employee.id,
            leave_type: leave_type.to_string(),
            as_of,
            service_year: current,
            entitled,
            carried_in,
            used: used[current.index()],
            adjusted: adjusted[current.index()],
            remaining,
            prorated: self.prorated(leave_type),
        }
    }

    /// Balances of every employee for every listed leave type, ordered by
    /// employee name, then code, then leave type. Empty `leave_types` means
    /// every leave type known to the book.
    #[must_use]
    pub fn summary(
        &self,
        leave_types: &[String],
        as_of: NaiveDate,
        options: SummaryOptions,
    ) -> Vec<SummaryRow> {
        let leave_types = if leave_types.is_empty() {
            self.book.leave_types()
        } else {
            leave_types.to_vec()
        };

        let employees: Vec<&Employee> = self
            .book
            .employees()
            .filter(|e| !(options.active_only && e.has_exited(as_of)))
            .collect();

        let mut rows: Vec<SummaryRow> = employees
            .par_iter()
            .flat_map_iter(|employee| {
                leave_types.iter().map(move |leave_type| {
                    let balance = if options.running {
                        self.running_balance(employee, leave_type, as_of)
                    } else {
                        self.balance(employee, leave_type, as_of)
                    };
                    SummaryRow {
                        employee_code: employee.code.clone(),
                        employee_name: employee.full_name.clone(),
                        balance,
                    }
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.employee_name
                .cmp(&b.employee_name)
                .then_with(|| a.employee_code.cmp(&b.employee_code))
                .then_with(|| a.balance.leave_type.cmp(&b.balance.leave_type))
        });

        debug!(
            tenant_id = %self.book.tenant_id(),
            employees = employees.len(),
            rows = rows.len(),
            "built leave summary"
        );
        rows
    }
}
