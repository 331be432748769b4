//! Employee model and related types.
//!
//! This module defines the Employee struct and EmploymentType enum
//! for representing staff on the payroll.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Permanent and pensionable employment.
    Permanent,
    /// Fixed-term contract.
    Contract,
    /// Casual employment paid by the day.
    Casual,
}

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name as it appears on the payslip.
    pub name: String,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// Department the employee belongs to.
    #[serde(default)]
    pub department: Option<String>,
    /// The date the employee started employment.
    pub employment_start_date: NaiveDate,
    /// Monthly basic salary in KES.
    pub basic_salary: Decimal,
    /// Monthly taxable allowances in KES (house, transport, etc).
    #[serde(default)]
    pub allowances: Decimal,
}
