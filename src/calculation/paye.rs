//! PAYE (Pay As You Earn) calculation.
//!
//! Monthly PAYE is computed on an annual basis: the monthly gross is
//! annualised, personal relief is deducted, the progressive schedule is
//! applied to what remains, and the annual tax is spread back over twelve
//! months.

use rust_decimal::Decimal;

use crate::config::PayeConfig;
use crate::error::EngineResult;
use crate::models::AuditStep;

use super::rounding::{ensure_non_negative, round_to_shilling};

/// Legal reference recorded on PAYE audit steps.
pub const PAYE_LEGAL_REF: &str = "Income Tax Act (Cap. 470), Third Schedule";

const MONTHS_PER_YEAR: i64 = 12;

/// The result of a PAYE calculation.
#[derive(Debug, Clone)]
pub struct PayeResult {
    /// Monthly PAYE rounded to the shilling.
    pub amount: Decimal,
    /// Annual income after personal relief, floored at zero.
    pub taxable_annual_income: Decimal,
    /// Annual tax before division and rounding.
    pub annual_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates monthly PAYE for a gross monthly salary.
///
/// Taxable income of zero or less yields zero tax. A negative salary fails
/// with `InvalidInput`.
///
/// # Examples
///
/// ```
/// use kenya_payroll_engine::calculation::calculate_paye;
/// use kenya_payroll_engine::config::{PayeBand, PayeConfig, TaxSchedule};
/// use rust_decimal::Decimal;
///
/// let config = PayeConfig {
///     personal_relief_annual: Decimal::from(28_800),
///     brackets: TaxSchedule::from_bands(&[
///         PayeBand { upper_bound: Some(Decimal::from(288_000)), rate: Decimal::new(10, 2) },
///         PayeBand { upper_bound: Some(Decimal::from(388_000)), rate: Decimal::new(25, 2) },
///         PayeBand { upper_bound: Some(Decimal::from(6_000_000)), rate: Decimal::new(30, 2) },
///         PayeBand { upper_bound: None, rate: Decimal::new(35, 2) },
///     ]).unwrap(),
/// };
///
/// let result = calculate_paye(Decimal::from(150_000), &config, 1).unwrap();
/// assert_eq!(result.amount, Decimal::from(39_063));
/// ```
pub fn calculate_paye(
    gross_monthly_salary: Decimal,
    config: &PayeConfig,
    step_number: u32,
) -> EngineResult<PayeResult> {
    ensure_non_negative("gross_salary", gross_monthly_salary)?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let annual_income = gross_monthly_salary * months;
    let taxable_annual_income = (annual_income - config.personal_relief_annual).max(Decimal::ZERO);

    let bracket = config.brackets.bracket_for(taxable_annual_income);
    let annual_tax = bracket
        .map(|b| b.tax_on(taxable_annual_income))
        .unwrap_or(Decimal::ZERO);
    let amount = round_to_shilling(annual_tax / months);

    let reasoning = match bracket {
        Some(b) => format!(
            "(KES {} x 12 - relief {}) = {} taxable; {} + ({} - {}) x {} = {} annual; / 12 = KES {}",
            gross_monthly_salary.normalize(),
            config.personal_relief_annual.normalize(),
            taxable_annual_income.normalize(),
            b.cumulative_base_tax.normalize(),
            taxable_annual_income.normalize(),
            b.lower_bound.normalize(),
            b.rate.normalize(),
            annual_tax.normalize(),
            amount
        ),
        None => format!(
            "Annual income KES {} does not exceed personal relief {}; no PAYE due",
            annual_income.normalize(),
            config.personal_relief_annual.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "paye".to_string(),
        rule_name: "PAYE Income Tax".to_string(),
        legal_ref: PAYE_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_monthly_salary": gross_monthly_salary.normalize().to_string(),
            "personal_relief_annual": config.personal_relief_annual.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_annual_income": taxable_annual_income.normalize().to_string(),
            "marginal_rate": bracket.map(|b| b.rate.normalize().to_string()),
            "annual_tax": annual_tax.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    Ok(PayeResult {
        amount,
        taxable_annual_income,
        annual_tax,
        audit_step,
    })
}

/// Computes monthly PAYE for a gross monthly salary.
pub fn compute_paye(gross_monthly_salary: Decimal, config: &PayeConfig) -> EngineResult<Decimal> {
    calculate_paye(gross_monthly_salary, config, 1).map(|r| r.amount)
}
