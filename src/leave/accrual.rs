//! Leave entitlement accrual and period opening.
//!
//! `upfront` leave types grant their whole entitlement at the start of the
//! leave year. `monthly` types earn one twelfth of it for every completed
//! month of service in the year.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{AccrualMethod, LeavePolicy, LeaveTypePolicy};
use crate::error::{EngineResult, ValidationError};
use crate::models::{Employee, LeaveBalance, LeaveType};

const MONTHS_PER_YEAR: u32 = 12;

/// Whole months from `from` to the end of `as_of`, capped at twelve.
fn completed_months(from: NaiveDate, as_of: NaiveDate) -> u32 {
    let Some(day_after) = as_of.checked_add_days(Days::new(1)) else {
        return MONTHS_PER_YEAR;
    };
    (1..=MONTHS_PER_YEAR)
        .take_while(|n| {
            from.checked_add_months(Months::new(*n))
                .is_some_and(|d| d <= day_after)
        })
        .count() as u32
}

/// Returns the days earned by `as_of` under `policy`.
///
/// Accrual counts from the later of `employment_start` and `period_start`.
/// Nothing is earned before that date. Monthly accruals are rounded to two
/// decimal places.
///
/// # Examples
///
/// ```
/// use kenya_payroll_engine::config::{AccrualMethod, LeaveTypePolicy};
/// use kenya_payroll_engine::leave::accrue_entitlement;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = LeaveTypePolicy {
///     entitlement_days: Decimal::from(21),
///     accrual: AccrualMethod::Monthly,
///     max_carry_forward: Decimal::from(10),
/// };
/// let year_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
///
/// assert_eq!(accrue_entitlement(&policy, year_start, year_start, as_of), Decimal::from(7));
/// ```
pub fn accrue_entitlement(
    policy: &LeaveTypePolicy,
    employment_start: NaiveDate,
    period_start: NaiveDate,
    as_of: NaiveDate,
) -> Decimal {
    let from = employment_start.max(period_start);
    if as_of < from {
        return Decimal::ZERO;
    }

    match policy.accrual {
        AccrualMethod::Upfront => policy.entitlement_days,
        AccrualMethod::Monthly => {
            let months = Decimal::from(completed_months(from, as_of));
            (policy.entitlement_days * months / Decimal::from(MONTHS_PER_YEAR))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
    }
}

/// Opens an employee's balance for the leave year starting `period_start`.
///
/// The entitlement is what has accrued by `as_of`. Unused days from
/// `previous` carry forward up to the policy's `max_carry_forward`.
///
/// # Errors
///
/// Returns `InvalidConfig` if the policy has no entry for `leave_type`, and a
/// `BalanceMismatch` validation error if `previous` belongs to a different
/// employee or leave type.
pub fn open_balance(
    employee: &Employee,
    leave_type: LeaveType,
    policy: &LeavePolicy,
    period_start: NaiveDate,
    as_of: NaiveDate,
    previous: Option<&LeaveBalance>,
) -> EngineResult<LeaveBalance> {
    let type_policy = policy.policy_for(leave_type)?;

    let carry_forward = match previous {
        Some(prev) if prev.employee_id() != employee.id || prev.leave_type() != leave_type => {
            return Err(ValidationError::BalanceMismatch {
                employee_id: employee.id.clone(),
                leave_type,
                balance_employee_id: prev.employee_id().to_string(),
                balance_leave_type: prev.leave_type(),
            }
            .into());
        }
        Some(prev) => prev.remaining().min(type_policy.max_carry_forward),
        None => Decimal::ZERO,
    };

    let entitlement = accrue_entitlement(
        type_policy,
        employee.employment_start_date,
        period_start,
        as_of,
    );

    tracing::debug!(
        employee_id = %employee.id,
        leave_type = %leave_type,
        period_start = %period_start,
        year = period_start.year(),
        entitlement = %entitlement,
        carry_forward = %carry_forward,
        "Opened leave balance"
    );

    LeaveBalance::new(employee.id.clone(), leave_type, entitlement, carry_forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::EmploymentType;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual_policy() -> LeaveTypePolicy {
        LeaveTypePolicy {
            entitlement_days: Decimal::from(21),
            accrual: AccrualMethod::Monthly,
            max_carry_forward: Decimal::from(10),
        }
    }

    fn sick_policy() -> LeaveTypePolicy {
        LeaveTypePolicy {
            entitlement_days: Decimal::from(14),
            accrual: AccrualMethod::Upfront,
            max_carry_forward: Decimal::ZERO,
        }
    }

    fn create_test_policy() -> LeavePolicy {
        LeavePolicy {
            leave_types: HashMap::from([
                (LeaveType::Annual, annual_policy()),
                (LeaveType::Sick, sick_policy()),
            ]),
        }
    }

    fn create_test_employee(start: NaiveDate) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Achieng Atieno".to_string(),
            employment_type: EmploymentType::Permanent,
            department: None,
            employment_start_date: start,
            basic_salary: Decimal::from(60_000),
            allowances: Decimal::ZERO,
        }
    }

    #[test]
    fn test_completed_months() {
        assert_eq!(completed_months(date(2024, 1, 1), date(2024, 1, 30)), 0);
        assert_eq!(completed_months(date(2024, 1, 1), date(2024, 1, 31)), 1);
        assert_eq!(completed_months(date(2024, 1, 15), date(2024, 3, 14)), 2);
        assert_eq!(completed_months(date(2024, 1, 1), date(2024, 12, 31)), 12);
        assert_eq!(completed_months(date(2024, 1, 1), date(2026, 6, 30)), 12);
    }

    #[test]
    fn test_monthly_accrual_full_year() {
        let year = date(2024, 1, 1);
        assert_eq!(
            accrue_entitlement(&annual_policy(), date(2019, 5, 1), year, date(2024, 12, 31)),
            Decimal::from(21)
        );
    }

    #[test]
    fn test_monthly_accrual_partial_year() {
        let year = date(2024, 1, 1);
        // 21 x 5 / 12 = 8.75
        assert_eq!(
            accrue_entitlement(&annual_policy(), date(2019, 5, 1), year, date(2024, 5, 31)),
            Decimal::new(875, 2)
        );
    }

    #[test]
    fn test_monthly_accrual_counts_from_employment_start() {
        let year = date(2024, 1, 1);
        // Joined 1 July: six months by year end, 21 x 6 / 12 = 10.5
        assert_eq!(
            accrue_entitlement(&annual_policy(), date(2024, 7, 1), year, date(2024, 12, 31)),
            Decimal::new(105, 1)
        );
    }

    #[test]
    fn test_nothing_accrues_before_start() {
        let year = date(2024, 1, 1);
        assert_eq!(
            accrue_entitlement(&sick_policy(), date(2024, 9, 1), year, date(2024, 8, 31)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_upfront_grants_full_entitlement() {
        let year = date(2024, 1, 1);
        assert_eq!(
            accrue_entitlement(&sick_policy(), date(2020, 1, 1), year, year),
            Decimal::from(14)
        );
    }

    #[test]
    fn test_open_balance_caps_carry_forward() {
        let employee = create_test_employee(date(2020, 1, 1));
        let previous = LeaveBalance::new("emp_001", LeaveType::Annual, Decimal::from(21), Decimal::ZERO)
            .unwrap()
            .with_used(Decimal::from(6))
            .unwrap();

        let balance = open_balance(
            &employee,
            LeaveType::Annual,
            &create_test_policy(),
            date(2025, 1, 1),
            date(2025, 12, 31),
            Some(&previous),
        )
        .unwrap();

        assert_eq!(balance.carry_forward(), Decimal::from(10));
        assert_eq!(balance.entitlement(), Decimal::from(21));
        assert_eq!(balance.remaining(), Decimal::from(31));
        assert_eq!(balance.used(), Decimal::ZERO);
    }

    #[test]
    fn test_open_balance_carries_less_than_cap() {
        let employee = create_test_employee(date(2020, 1, 1));
        let previous = LeaveBalance::new("emp_001", LeaveType::Annual, Decimal::from(21), Decimal::ZERO)
            .unwrap()
            .with_used(Decimal::from(18))
            .unwrap();

        let balance = open_balance(
            &employee,
            LeaveType::Annual,
            &create_test_policy(),
            date(2025, 1, 1),
            date(2025, 1, 31),
            Some(&previous),
        )
        .unwrap();

        assert_eq!(balance.carry_forward(), Decimal::from(3));
        assert_eq!(balance.entitlement(), Decimal::new(175, 2));
    }

    #[test]
    fn test_open_balance_upfront_type_does_not_carry() {
        let employee = create_test_employee(date(2020, 1, 1));
        let previous =
            LeaveBalance::new("emp_001", LeaveType::Sick, Decimal::from(14), Decimal::ZERO).unwrap();

        let balance = open_balance(
            &employee,
            LeaveType::Sick,
            &create_test_policy(),
            date(2025, 1, 1),
            date(2025, 1, 1),
            Some(&previous),
        )
        .unwrap();

        assert_eq!(balance.carry_forward(), Decimal::ZERO);
        assert_eq!(balance.remaining(), Decimal::from(14));
    }

    #[test]
    fn test_open_balance_rejects_foreign_previous() {
        let employee = create_test_employee(date(2020, 1, 1));
        let previous =
            LeaveBalance::new("emp_002", LeaveType::Annual, Decimal::from(21), Decimal::ZERO).unwrap();

        let result = open_balance(
            &employee,
            LeaveType::Annual,
            &create_test_policy(),
            date(2025, 1, 1),
            date(2025, 1, 1),
            Some(&previous),
        );
        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::BalanceMismatch { .. }))
        ));
    }

    #[test]
    fn test_open_balance_unknown_policy() {
        let employee = create_test_employee(date(2020, 1, 1));
        let result = open_balance(
            &employee,
            LeaveType::Maternity,
            &create_test_policy(),
            date(2025, 1, 1),
            date(2025, 1, 1),
            None,
        );
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }
}
