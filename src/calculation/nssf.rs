//! NSSF contribution calculation.
//!
//! Two models are supported behind the same call: the single-tier
//! ceiling-and-rate model, and the NSSF Act 2013 model with Tier I up to the
//! lower earnings limit and Tier II from there to the upper earnings limit.

use rust_decimal::Decimal;

use crate::config::NssfScheme;
use crate::error::EngineResult;
use crate::models::AuditStep;

use super::rounding::{ensure_non_negative, round_to_shilling};

/// Legal reference recorded on NSSF audit steps.
pub const NSSF_LEGAL_REF: &str = "NSSF Act No. 45 of 2013, s.20";

/// The result of an NSSF calculation.
#[derive(Debug, Clone)]
pub struct NssfResult {
    /// Monthly employee contribution, rounded to the shilling.
    pub amount: Decimal,
    /// Pensionable pay after applying the ceiling (or upper earnings limit).
    pub pensionable_pay: Decimal,
    /// Tier I contribution before rounding (the whole contribution for flat schemes).
    pub tier_one: Decimal,
    /// Tier II contribution before rounding (zero for flat schemes).
    pub tier_two: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the NSSF contribution on a monthly pensionable pay figure.
///
/// Which salary counts as pensionable pay is decided by the caller from
/// [`NssfScheme::basis`].
///
/// # Examples
///
/// ```
/// use kenya_payroll_engine::calculation::calculate_nssf;
/// use kenya_payroll_engine::config::{NssfScheme, PensionableBasis};
/// use rust_decimal::Decimal;
///
/// let scheme = NssfScheme::Flat {
///     ceiling: Decimal::from(36_000),
///     rate: Decimal::new(6, 2),
///     basis: PensionableBasis::Gross,
/// };
/// let result = calculate_nssf(Decimal::from(50_000), &scheme, 1).unwrap();
/// assert_eq!(result.amount, Decimal::from(2_160));
/// ```
pub fn calculate_nssf(
    pensionable_salary: Decimal,
    scheme: &NssfScheme,
    step_number: u32,
) -> EngineResult<NssfResult> {
    ensure_non_negative("pensionable_salary", pensionable_salary)?;

    let (pensionable_pay, tier_one, tier_two, reasoning) = match scheme {
        NssfScheme::Flat { ceiling, rate, .. } => {
            let pensionable_pay = pensionable_salary.min(*ceiling);
            let contribution = pensionable_pay * rate;
            (
                pensionable_pay,
                contribution,
                Decimal::ZERO,
                format!(
                    "min(KES {}, ceiling {}) x {} = KES {}",
                    pensionable_salary.normalize(),
                    ceiling.normalize(),
                    rate.normalize(),
                    contribution.normalize()
                ),
            )
        }
        NssfScheme::Tiered {
            lower_earnings_limit,
            upper_earnings_limit,
            rate,
            ..
        } => {
            let pensionable_pay = pensionable_salary.min(*upper_earnings_limit);
            let tier_one = pensionable_pay.min(*lower_earnings_limit) * rate;
            let tier_two = (pensionable_pay - lower_earnings_limit).max(Decimal::ZERO) * rate;
            (
                pensionable_pay,
                tier_one,
                tier_two,
                format!(
                    "Tier I {} + Tier II {} on pensionable pay KES {} (LEL {}, UEL {}) at {}",
                    tier_one.normalize(),
                    tier_two.normalize(),
                    pensionable_pay.normalize(),
                    lower_earnings_limit.normalize(),
                    upper_earnings_limit.normalize(),
                    rate.normalize()
                ),
            )
        }
    };

    let amount = round_to_shilling(tier_one + tier_two);

    let audit_step = AuditStep {
        step_number,
        rule_id: "nssf".to_string(),
        rule_name: "NSSF Contribution".to_string(),
        legal_ref: NSSF_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "pensionable_salary": pensionable_salary.normalize().to_string(),
            "basis": scheme.basis()
        }),
        output: serde_json::json!({
            "pensionable_pay": pensionable_pay.normalize().to_string(),
            "tier_one": tier_one.normalize().to_string(),
            "tier_two": tier_two.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    Ok(NssfResult {
        amount,
        pensionable_pay,
        tier_one,
        tier_two,
        audit_step,
    })
}

/// Computes the NSSF contribution on a monthly pensionable pay figure.
pub fn compute_nssf(pensionable_salary: Decimal, scheme: &NssfScheme) -> EngineResult<Decimal> {
    calculate_nssf(pensionable_salary, scheme, 1).map(|r| r.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PensionableBasis;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn flat_scheme() -> NssfScheme {
        NssfScheme::Flat {
            ceiling: dec("36000"),
            rate: dec("0.06"),
            basis: PensionableBasis::Gross,
        }
    }

    fn tiered_scheme() -> NssfScheme {
        NssfScheme::Tiered {
            lower_earnings_limit: dec("7000"),
            upper_earnings_limit: dec("36000"),
            rate: dec("0.06"),
            basis: PensionableBasis::Gross,
        }
    }

    #[test]
    fn test_flat_above_ceiling_is_capped() {
        let result = calculate_nssf(dec("50000"), &flat_scheme(), 1).unwrap();

        assert_eq!(result.amount, dec("2160"));
        assert_eq!(result.pensionable_pay, dec("36000"));
        assert_eq!(result.tier_two, Decimal::ZERO);
        assert_eq!(result.audit_step.rule_id, "nssf");
        assert_eq!(result.audit_step.output["amount"].as_str().unwrap(), "2160");
    }

    #[test]
    fn test_flat_below_ceiling() {
        // 20,000 x 6% = 1,200
        assert_eq!(
            compute_nssf(dec("20000"), &flat_scheme()).unwrap(),
            dec("1200")
        );
    }

    #[test]
    fn test_flat_rounds_half_up() {
        // 12,345.75 x 6% = 740.745 -> 741
        assert_eq!(
            compute_nssf(dec("12345.75"), &flat_scheme()).unwrap(),
            dec("741")
        );
    }

    #[test]
    fn test_zero_salary() {
        assert_eq!(
            compute_nssf(Decimal::ZERO, &flat_scheme()).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_tiered_below_lower_limit() {
        let result = calculate_nssf(dec("5000"), &tiered_scheme(), 1).unwrap();
        assert_eq!(result.tier_one, dec("300"));
        assert_eq!(result.tier_two, Decimal::ZERO);
        assert_eq!(result.amount, dec("300"));
    }

    #[test]
    fn test_tiered_between_limits() {
        // Tier I 7,000 x 6% = 420; Tier II 13,000 x 6% = 780
        let result = calculate_nssf(dec("20000"), &tiered_scheme(), 1).unwrap();
        assert_eq!(result.tier_one, dec("420"));
        assert_eq!(result.tier_two, dec("780"));
        assert_eq!(result.amount, dec("1200"));
    }

    #[test]
    fn test_tiered_above_upper_limit() {
        // Tier I 420 + Tier II 29,000 x 6% = 1,740
        let result = calculate_nssf(dec("150000"), &tiered_scheme(), 1).unwrap();
        assert_eq!(result.pensionable_pay, dec("36000"));
        assert_eq!(result.amount, dec("2160"));
    }

    #[test]
    fn test_negative_salary_is_invalid_input() {
        assert!(matches!(
            compute_nssf(dec("-100"), &flat_scheme()),
            Err(EngineError::InvalidInput { .. })
        ));
    }
}
