//! Validation of manually entered deduction amounts.
//!
//! Validation never stops at the first problem: every issue found is
//! returned, and the caller decides whether an `Error` blocks the save.
//! Warnings are advisory.

use rust_decimal::Decimal;

use crate::config::{DeductionCatalog, StatutoryRates};
use crate::error::ValidationIssue;

use super::statutory::compute_component;

/// Salary and configuration an entered deduction is checked against.
#[derive(Debug, Clone, Copy)]
pub struct DeductionContext<'a> {
    /// Employee's monthly gross salary.
    pub gross_salary: Decimal,
    /// Employee's monthly basic salary.
    pub basic_salary: Decimal,
    /// Statutory rates in force for the pay date.
    pub rates: &'a StatutoryRates,
    /// Known deduction types and the auto-calculation tolerance.
    pub catalog: &'a DeductionCatalog,
}

/// Checks a proposed deduction amount against the catalogue.
///
/// - Negative amounts are an error.
/// - Unknown deduction type codes are an error.
/// - Amounts above a limited type's `max_amount` are an error.
/// - For auto-calculated types, a difference from the computed value larger
///   than the catalogue tolerance is a warning.
///
/// # Examples
///
/// ```no_run
/// use kenya_payroll_engine::calculation::{validate_deduction_amount, DeductionContext};
/// use kenya_payroll_engine::config::{ConfigLoader, RateProvider};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kenya").unwrap();
/// let rates = loader.rates_for(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()).unwrap();
/// let context = DeductionContext {
///     gross_salary: Decimal::from(50_000),
///     basic_salary: Decimal::from(40_000),
///     rates,
///     catalog: loader.deductions(),
/// };
/// let issues = validate_deduction_amount("sacco", Decimal::from(60_000), &context);
/// assert!(issues.iter().any(|i| i.is_blocking()));
/// ```
pub fn validate_deduction_amount(
    deduction_type: &str,
    proposed_amount: Decimal,
    context: &DeductionContext<'_>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if proposed_amount < Decimal::ZERO {
        issues.push(ValidationIssue::error(
            "amount",
            format!("Deduction amount cannot be negative (got {})", proposed_amount),
        ));
    }

    let deduction = match context.catalog.get(deduction_type) {
        Ok(d) => d,
        Err(err) => {
            issues.push(ValidationIssue::error("deduction_type", err.to_string()));
            return issues;
        }
    };

    if deduction.has_limit {
        if let Some(max_amount) = deduction.max_amount {
            if proposed_amount > max_amount {
                issues.push(ValidationIssue::error(
                    "amount",
                    format!(
                        "{} cannot exceed KES {} (got {})",
                        deduction.name,
                        max_amount.normalize(),
                        proposed_amount.normalize()
                    ),
                ));
            }
        }
    }

    if let Some(component) = deduction.auto_calculated {
        match compute_component(
            component,
            context.gross_salary,
            context.basic_salary,
            context.rates,
        ) {
            Ok(expected) => {
                let tolerance = context.catalog.auto_calculation_tolerance;
                if (proposed_amount - expected).abs() > tolerance {
                    issues.push(ValidationIssue::warning(
                        "amount",
                        format!(
                            "{} is normally KES {} for this salary; entered KES {}",
                            component,
                            expected,
                            proposed_amount.normalize()
                        ),
                    ));
                }
            }
            Err(err) => {
                issues.push(ValidationIssue::error("gross_salary", err.to_string()));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DeductionType, HousingLevyConfig, NhifBracketRow, NhifTable, NssfScheme, PayeBand,
        PayeConfig, PensionableBasis, TaxSchedule,
    };
    use crate::error::Severity;
    use crate::models::{DeductionCategory, StatutoryComponent};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_rates() -> StatutoryRates {
        StatutoryRates {
            effective_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
            paye: PayeConfig {
                personal_relief_annual: dec("28800"),
                brackets: TaxSchedule::from_bands(&[
                    PayeBand {
                        upper_bound: Some(dec("288000")),
                        rate: dec("0.10"),
                    },
                    PayeBand {
                        upper_bound: None,
                        rate: dec("0.30"),
                    },
                ])
                .unwrap(),
            },
            nhif: NhifTable {
                rows: vec![
                    NhifBracketRow {
                        min: dec("0"),
                        max: dec("49999"),
                        amount: dec("1100"),
                    },
                    NhifBracketRow {
                        min: dec("50000"),
                        max: dec("59999"),
                        amount: dec("1200"),
                    },
                ],
                maximum_amount: dec("1700"),
            },
            nssf: NssfScheme::Flat {
                ceiling: dec("36000"),
                rate: dec("0.06"),
                basis: PensionableBasis::Gross,
            },
            housing_levy: HousingLevyConfig { rate: dec("0.015") },
        }
    }

    fn create_test_catalog() -> DeductionCatalog {
        DeductionCatalog {
            auto_calculation_tolerance: dec("10"),
            deduction_types: vec![
                DeductionType {
                    code: "nhif".to_string(),
                    name: "NHIF".to_string(),
                    category: DeductionCategory::Statutory,
                    has_limit: false,
                    max_amount: None,
                    auto_calculated: Some(StatutoryComponent::Nhif),
                },
                DeductionType {
                    code: "sacco".to_string(),
                    name: "SACCO Contribution".to_string(),
                    category: DeductionCategory::Savings,
                    has_limit: true,
                    max_amount: Some(dec("50000")),
                    auto_calculated: None,
                },
                DeductionType {
                    code: "helb".to_string(),
                    name: "HELB Loan".to_string(),
                    category: DeductionCategory::Loan,
                    has_limit: false,
                    max_amount: None,
                    auto_calculated: None,
                },
            ],
        }
    }

    fn context<'a>(rates: &'a StatutoryRates, catalog: &'a DeductionCatalog) -> DeductionContext<'a> {
        DeductionContext {
            gross_salary: dec("50000"),
            basic_salary: dec("40000"),
            rates,
            catalog,
        }
    }

    #[test]
    fn test_amount_within_limit_has_no_issues() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("sacco", dec("50000"), &context(&rates, &catalog));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_amount_above_limit_is_error() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("sacco", dec("50000.01"), &context(&rates, &catalog));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].field, "amount");
        assert!(issues[0].message.contains("50000"));
    }

    #[test]
    fn test_unlimited_type_accepts_large_amount() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("helb", dec("1000000"), &context(&rates, &catalog));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_type_is_error() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("gym", dec("500"), &context(&rates, &catalog));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "deduction_type");
        assert!(issues[0].is_blocking());
        assert!(issues[0].message.contains("gym"));
    }

    #[test]
    fn test_negative_amount_is_error() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("helb", dec("-1"), &context(&rates, &catalog));

        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_blocking());
        assert!(issues[0].message.contains("negative"));
    }

    #[test]
    fn test_auto_calculated_within_tolerance_passes() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        // Computed NHIF on 50,000 is 1,200; 1,210 is exactly at the tolerance.
        let issues = validate_deduction_amount("nhif", dec("1210"), &context(&rates, &catalog));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_auto_calculated_override_is_warning() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("nhif", dec("1500"), &context(&rates, &catalog));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!issues[0].is_blocking());
        assert!(issues[0].message.contains("1200"));
    }

    #[test]
    fn test_negative_auto_calculated_reports_error_and_warning() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let issues = validate_deduction_amount("nhif", dec("-5"), &context(&rates, &catalog));

        let severities: Vec<Severity> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Warning]);
    }

    #[test]
    fn test_invalid_salary_context_is_error() {
        let (rates, catalog) = (create_test_rates(), create_test_catalog());
        let mut ctx = context(&rates, &catalog);
        ctx.gross_salary = dec("-100");

        let issues = validate_deduction_amount("nhif", dec("1200"), &ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "gross_salary");
        assert!(issues[0].is_blocking());
    }
}
