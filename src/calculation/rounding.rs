//! Rounding and input guards shared by the statutory calculations.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Rounds an amount to the nearest whole shilling, halves away from zero.
///
/// # Examples
///
/// ```
/// use kenya_payroll_engine::calculation::round_to_shilling;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_shilling(Decimal::new(25005, 1)), Decimal::from(2501));
/// assert_eq!(round_to_shilling(Decimal::new(25004, 1)), Decimal::from(2500));
/// ```
pub fn round_to_shilling(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Fails with `InvalidInput` if `value` is negative.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}
