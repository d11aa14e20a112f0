//! In-memory, tenant-scoped snapshot of everything the balance engine reads.
//!
//! The persistence layer loads one `TenantLeaveBook` per read transaction;
//! the engine only ever reads from it, so a loaded book can be shared across
//! threads for concurrent balance queries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use tracing::{info, warn};
use leavebook_shared::types::{EmployeeId, TenantId};

use super::error::LeaveError;
use super::types::{Employee, LeaveAdjustment, LeaveApplication};
use crate::calendar::{CalendarPolicy, Holiday, HolidayCalendar, WeeklySchedule};
use crate::entitlement::{self, EntitlementGrid, EntitlementTable, ServiceYear};

/// Tenant-scoped leave records.
#[derive(Debug, Clone)]
pub struct TenantLeaveBook {
    tenant_id: TenantId,
    employees: BTreeMap<EmployeeId, Employee>,
    schedules: HashMap<EmployeeId, WeeklySchedule>,
    holidays: Vec<Holiday>,
    tables: BTreeMap<String, EntitlementTable>,
    grids: HashMap<EmployeeId, EntitlementGrid>,
    applications: HashMap<EmployeeId, Vec<LeaveApplication>>,
    adjustments: HashMap<EmployeeId, Vec<LeaveAdjustment>>,
}

impl TenantLeaveBook {
    /// Creates an empty book for a tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            employees: BTreeMap::new(),
            schedules: HashMap::new(),
            holidays: Vec::new(),
            tables: BTreeMap::new(),
            grids: HashMap::new(),
            applications: HashMap::new(),
            adjustments: HashMap::new(),
        }
    }

    /// The tenant every record in this book belongs to.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn owns(&self, tenant_id: TenantId, record: &'static str) -> bool {
        if tenant_id == self.tenant_id {
            return true;
        }
        warn!(
            tenant_id = %self.tenant_id,
            foreign_tenant_id = %tenant_id,
            record,
            "skipping record from another tenant"
        );
        false
    }

    /// Adds or replaces an employee. Returns false if it belongs to another tenant.
    pub fn insert_employee(&mut self, employee: Employee) -> bool {
        if !self.owns(employee.tenant_id, "employee") {
            return false;
        }
        self.employees.insert(employee.id, employee);
        true
    }

    /// Sets an employee's weekly schedule.
    pub fn set_schedule(&mut self, employee_id: EmployeeId, schedule: WeeklySchedule) {
        self.schedules.insert(employee_id, schedule);
    }

    /// Adds a holiday. Returns false if it belongs to another tenant.
    pub fn add_holiday(&mut self, holiday: Holiday) -> bool {
        if !self.owns(holiday.tenant_id, "holiday") {
            return false;
        }
        self.holidays.push(holiday);
        true
    }

    /// Adds or replaces the table for a leave type.
    pub fn insert_table(&mut self, table: EntitlementTable) {
        self.tables.insert(table.leave_type.clone(), table);
    }

    /// Sets an employee's entitlement grid.
    pub fn set_grid(&mut self, grid: EntitlementGrid) {
        self.grids.insert(grid.employee_id(), grid);
    }

    /// Adds a recorded application. Returns false if it belongs to another tenant.
    pub fn record_application(&mut self, application: LeaveApplication) -> bool {
        if !self.owns(application.tenant_id, "leave application") {
            return false;
        }
        self.applications
            .entry(application.employee_id)
            .or_default()
            .push(application);
        true
    }

    /// Adds a recorded adjustment. Returns false if it belongs to another tenant.
    pub fn record_adjustment(&mut self, adjustment: LeaveAdjustment) -> bool {
        if !self.owns(adjustment.tenant_id, "leave adjustment") {
            return false;
        }
        self.adjustments
            .entry(adjustment.employee_id)
            .or_default()
            .push(adjustment);
        true
    }

    /// Looks up an employee.
    #[must_use]
    pub fn employee(&self, employee_id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&employee_id)
    }

    /// Looks up an employee, failing if it is not in this book.
    pub fn require_employee(&self, employee_id: EmployeeId) -> Result<&Employee, LeaveError> {
        self.employee(employee_id)
            .ok_or(LeaveError::EmployeeNotFound(employee_id.into_inner()))
    }

    /// All employees, ordered by ID.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    /// The tenant table for a leave type.
    #[must_use]
    pub fn table(&self, leave_type: &str) -> Option<&EntitlementTable> {
        self.tables.get(leave_type)
    }

    /// All tenant tables, ordered by leave type.
    pub fn tables(&self) -> impl Iterator<Item = &EntitlementTable> {
        self.tables.values()
    }

    /// An employee's entitlement grid.
    #[must_use]
    pub fn grid(&self, employee_id: EmployeeId) -> Option<&EntitlementGrid> {
        self.grids.get(&employee_id)
    }

    /// Every leave type named by a table or an employee grid, sorted.
    #[must_use]
    pub fn leave_types(&self) -> Vec<String> {
        let mut names: BTreeSet<&str> = self.tables.keys().map(String::as_str).collect();
        for grid in self.grids.values() {
            names.extend(grid.leave_types());
        }
        names.into_iter().map(str::to_string).collect()
    }

    /// The calendar policy of one employee: their schedule (or the default
    /// policy) and the holidays of their holiday group.
    pub fn calendar_for(&self, employee_id: EmployeeId) -> Result<CalendarPolicy, LeaveError> {
        let employee = self.require_employee(employee_id)?;
        let schedule = self.schedules.get(&employee_id).cloned().unwrap_or_default();
        let holidays = HolidayCalendar::for_group(&self.holidays, &employee.holiday_group);
        Ok(CalendarPolicy::new(schedule, holidays))
    }

    /// Days entitled for one employee, leave type and band.
    #[must_use]
    pub fn entitled_days(&self, employee_id: EmployeeId, leave_type: &str, year: ServiceYear) -> Decimal {
        entitlement::entitled_days(
            self.grid(employee_id),
            self.table(leave_type),
            leave_type,
            year,
        )
    }

    /// Applications recorded for an employee and leave type, any status.
    pub fn applications_for<'a>(
        &'a self,
        employee_id: EmployeeId,
        leave_type: &'a str,
    ) -> impl Iterator<Item = &'a LeaveApplication> + 'a {
        self.applications
            .get(&employee_id)
            .into_iter()
            .flatten()
            .filter(move |a| a.leave_type == leave_type)
    }

    /// Adjustments recorded for an employee and leave type.
    pub fn adjustments_for<'a>(
        &'a self,
        employee_id: EmployeeId,
        leave_type: &'a str,
    ) -> impl Iterator<Item = &'a LeaveAdjustment> + 'a {
        self.adjustments
            .get(&employee_id)
            .into_iter()
            .flatten()
            .filter(move |a| a.leave_type == leave_type)
    }

    /// Replaces one employee's grid with a copy of every tenant table.
    pub fn load_defaults(&mut self, employee_id: EmployeeId) -> Result<&EntitlementGrid, LeaveError> {
        self.require_employee(employee_id)?;
        let grid = EntitlementGrid::load_defaults(employee_id, self.tables.values());
        info!(
            tenant_id = %self.tenant_id,
            employee_id = %employee_id,
            leave_types = self.tables.len(),
            "loaded default entitlements"
        );
        self.grids.insert(employee_id, grid);
        Ok(&self.grids[&employee_id])
    }

    /// Replaces every employee's grid with a copy of every tenant table.
    /// Returns the number of employees updated.
    pub fn load_defaults_all(&mut self) -> usize {
        let ids: Vec<EmployeeId> = self.employees.keys().copied().collect();
        for &employee_id in &ids {
            let grid = EntitlementGrid::load_defaults(employee_id, self.tables.values());
            self.grids.insert(employee_id, grid);
        }
        info!(
            tenant_id = %self.tenant_id,
            employees = ids.len(),
            leave_types = self.tables.len(),
            "loaded default entitlements for tenant"
        );
        ids.len()
    }
}
