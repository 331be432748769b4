//! NHIF contribution lookup.
//!
//! NHIF is a flat monthly fee selected from a bracket table by gross salary.
//! Salaries above the table, or otherwise matching no row, pay the table's
//! maximum fee; this is a policy, not an error.

use rust_decimal::Decimal;

use crate::config::NhifTable;
use crate::error::EngineResult;
use crate::models::AuditStep;

use super::rounding::ensure_non_negative;

/// Legal reference recorded on NHIF audit steps.
pub const NHIF_LEGAL_REF: &str = "NHIF Act No. 9 of 1998, Standard Contribution Rates";

/// The result of an NHIF lookup.
#[derive(Debug, Clone)]
pub struct NhifResult {
    /// Monthly contribution.
    pub amount: Decimal,
    /// Whether the maximum fee was applied because no row matched.
    pub capped: bool,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Looks up the NHIF contribution for a gross monthly salary.
///
/// The table is keyed on whole shillings, so the salary is floored before
/// matching `min <= salary <= max`.
pub fn calculate_nhif(
    gross_monthly_salary: Decimal,
    table: &NhifTable,
    step_number: u32,
) -> EngineResult<NhifResult> {
    ensure_non_negative("gross_salary", gross_monthly_salary)?;

    let whole_shillings = gross_monthly_salary.floor();
    let row = table
        .rows
        .iter()
        .find(|r| r.min <= whole_shillings && whole_shillings <= r.max);

    let (amount, capped, reasoning) = match row {
        Some(r) => (
            r.amount,
            false,
            format!(
                "KES {} falls in {} - {}: flat fee KES {}",
                whole_shillings, r.min, r.max, r.amount
            ),
        ),
        None => (
            table.maximum_amount,
            true,
            format!(
                "KES {} is above the table; maximum fee KES {} applies",
                whole_shillings, table.maximum_amount
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "nhif".to_string(),
        rule_name: "NHIF Contribution".to_string(),
        legal_ref: NHIF_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_monthly_salary": gross_monthly_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "bracket_min": row.map(|r| r.min.to_string()),
            "bracket_max": row.map(|r| r.max.to_string()),
            "capped": capped,
            "amount": amount.to_string()
        }),
        reasoning,
    };

    Ok(NhifResult {
        amount,
        capped,
        audit_step,
    })
}

/// Computes the NHIF contribution for a gross monthly salary.
pub fn compute_nhif(gross_monthly_salary: Decimal, table: &NhifTable) -> EngineResult<Decimal> {
    calculate_nhif(gross_monthly_salary, table, 1).map(|r| r.amount)
}
