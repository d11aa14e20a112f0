//! Leave applications, adjustments and balances.

pub mod balance;
pub mod book;
pub mod error;
pub mod service;
pub mod types;
pub mod working_days;

#[cfg(test)]
mod props;

pub use balance::{BalanceEngine, LeaveBalance, SummaryOptions, SummaryRow};
pub use book::TenantLeaveBook;
pub use error::LeaveError;
pub use service::{LeavePreview, LeaveService};
pub use types::{
    ApplicationStatus, DateSpan, Employee, HalfDay, LeaveAdjustment, LeaveApplication,
    NewLeaveAdjustment, NewLeaveApplication,
};
pub use working_days::{daily_breakdown, span_working_days, working_days};
