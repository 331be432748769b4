//! Deduction models.
//!
//! This module contains the [`DeductionResult`] returned by the statutory
//! calculator and the identifiers used by the deduction catalogue.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

/// One of the four statutory deductions the calculator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutoryComponent {
    /// Pay As You Earn income tax.
    Paye,
    /// National Hospital Insurance Fund contribution.
    Nhif,
    /// National Social Security Fund contribution.
    Nssf,
    /// Affordable Housing Levy.
    HousingLevy,
}

impl fmt::Display for StatutoryComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatutoryComponent::Paye => "PAYE",
            StatutoryComponent::Nhif => "NHIF",
            StatutoryComponent::Nssf => "NSSF",
            StatutoryComponent::HousingLevy => "Housing Levy",
        })
    }
}

/// Broad grouping of a deduction type in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    /// Required by law.
    Statutory,
    /// Loan repayment (HELB, salary advance, etc).
    Loan,
    /// SACCO or pension savings.
    Savings,
    /// Insurance premiums.
    Insurance,
    /// Anything else (union dues, welfare).
    Other,
}

/// Statutory deductions for one month's pay.
///
/// # Example
///
/// ```
/// use kenya_payroll_engine::models::{AuditTrace, DeductionResult};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let result = DeductionResult {
///     rates_effective_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
///     gross_salary: Decimal::from(50_000),
///     basic_salary: Decimal::from(40_000),
///     paye_tax: Decimal::from(9_063),
///     nhif: Decimal::from(1_200),
///     nssf: Decimal::from(2_160),
///     housing_levy: Decimal::from(750),
///     total_statutory: Decimal::from(13_173),
///     net_after_statutory: Decimal::from(36_827),
///     audit_trace: AuditTrace::default(),
/// };
/// assert_eq!(result.component(kenya_payroll_engine::models::StatutoryComponent::Nssf), Decimal::from(2_160));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    /// Effective date of the rate schedule that was applied.
    pub rates_effective_date: NaiveDate,
    /// Monthly gross salary the deductions were computed from.
    pub gross_salary: Decimal,
    /// Monthly basic salary supplied with the gross.
    pub basic_salary: Decimal,
    /// Monthly PAYE.
    pub paye_tax: Decimal,
    /// Monthly NHIF contribution.
    pub nhif: Decimal,
    /// Monthly NSSF contribution (employee share).
    pub nssf: Decimal,
    /// Monthly housing levy (employee share).
    pub housing_levy: Decimal,
    /// Sum of the four statutory amounts.
    pub total_statutory: Decimal,
    /// Gross salary less the statutory total.
    pub net_after_statutory: Decimal,
    /// How each figure was reached.
    pub audit_trace: AuditTrace,
}

impl DeductionResult {
    /// Returns the amount computed for a single component.
    pub fn component(&self, component: StatutoryComponent) -> Decimal {
        match component {
            StatutoryComponent::Paye => self.paye_tax,
            StatutoryComponent::Nhif => self.nhif,
            StatutoryComponent::Nssf => self.nssf,
            StatutoryComponent::HousingLevy => self.housing_levy,
        }
    }
}
