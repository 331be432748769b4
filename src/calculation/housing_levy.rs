//! Affordable Housing Levy calculation.

use rust_decimal::Decimal;

use crate::config::HousingLevyConfig;
use crate::error::EngineResult;
use crate::models::AuditStep;

use super::rounding::{ensure_non_negative, round_to_shilling};

/// Legal reference recorded on housing levy audit steps.
pub const HOUSING_LEVY_LEGAL_REF: &str = "Affordable Housing Act 2024, s.4";

/// The result of a housing levy calculation.
#[derive(Debug, Clone)]
pub struct HousingLevyResult {
    /// Monthly employee levy, rounded to the shilling.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee housing levy on gross monthly salary. There is no cap.
pub fn calculate_housing_levy(
    gross_monthly_salary: Decimal,
    config: &HousingLevyConfig,
    step_number: u32,
) -> EngineResult<HousingLevyResult> {
    ensure_non_negative("gross_salary", gross_monthly_salary)?;

    let levy = gross_monthly_salary * config.rate;
    let amount = round_to_shilling(levy);

    let audit_step = AuditStep {
        step_number,
        rule_id: "housing_levy".to_string(),
        rule_name: "Affordable Housing Levy".to_string(),
        legal_ref: HOUSING_LEVY_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_monthly_salary": gross_monthly_salary.normalize().to_string(),
            "rate": config.rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "KES {} x {} = KES {}",
            gross_monthly_salary.normalize(),
            config.rate.normalize(),
            levy.normalize()
        ),
    };

    Ok(HousingLevyResult { amount, audit_step })
}

/// Computes the employee housing levy on gross monthly salary.
pub fn compute_housing_levy(
    gross_monthly_salary: Decimal,
    config: &HousingLevyConfig,
) -> EngineResult<Decimal> {
    calculate_housing_levy(gross_monthly_salary, config, 1).map(|r| r.amount)
}
