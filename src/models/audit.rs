//! Audit trail models.
//!
//! Every statutory computation records an [`AuditStep`] describing which rule
//! was applied, the legal reference it came from, and the exact inputs and
//! outputs, so that a payslip figure can be traced back to the rate table.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use kenya_payroll_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "housing_levy".to_string(),
///     rule_name: "Affordable Housing Levy".to_string(),
///     legal_ref: "Affordable Housing Act 2024, s.4".to_string(),
///     input: serde_json::json!({ "gross_salary": "100000" }),
///     output: serde_json::json!({ "amount": "1500" }),
///     reasoning: "KES 100000 x 0.015 = KES 1500".to_string(),
/// };
/// assert_eq!(step.rule_id, "housing_levy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or schedule the rule implements.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns the step recorded for a rule, if any.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}
