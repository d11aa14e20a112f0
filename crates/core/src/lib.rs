//! Core leave logic for Leavebook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every day quantity is a `Decimal` in half-day steps.
//!
//! # Modules
//!
//! - `calendar` - Weekly work schedules and holiday calendars
//! - `entitlement` - Service-year bands, entitlement tables and carry-forward
//! - `leave` - Working-day counting, submissions and the balance engine

pub mod calendar;
pub mod entitlement;
pub mod leave;
