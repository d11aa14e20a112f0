//! Entity prelude.

pub use super::employee_leave_entitlements::Entity as EmployeeLeaveEntitlements;
pub use super::employee_work_schedule::Entity as EmployeeWorkSchedule;
pub use super::employees::Entity as Employees;
pub use super::holidays::Entity as Holidays;
pub use super::leave_adjustments::Entity as LeaveAdjustments;
pub use super::leave_applications::Entity as LeaveApplications;
pub use super::leave_defaults::Entity as LeaveDefaults;
pub use super::tenants::Entity as Tenants;
