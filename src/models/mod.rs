//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod deduction;
mod employee;
mod leave;

pub use audit::{AuditStep, AuditTrace};
pub use deduction::{DeductionCategory, DeductionResult, StatutoryComponent};
pub use employee::{Employee, EmploymentType};
pub use leave::{LeaveApplication, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType};
