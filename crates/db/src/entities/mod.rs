//! `SeaORM` entity definitions.

pub mod prelude;

pub mod employee_leave_entitlements;
pub mod employee_work_schedule;
pub mod employees;
pub mod holidays;
pub mod leave_adjustments;
pub mod leave_applications;
pub mod leave_defaults;
pub mod tenants;
