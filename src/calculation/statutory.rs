//! Combined statutory deduction calculation.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{PensionableBasis, StatutoryRates};
use crate::error::EngineResult;
use crate::models::{AuditTrace, DeductionResult, StatutoryComponent};

use super::housing_levy::{calculate_housing_levy, compute_housing_levy};
use super::nhif::{calculate_nhif, compute_nhif};
use super::nssf::{calculate_nssf, compute_nssf};
use super::paye::{calculate_paye, compute_paye};
use super::rounding::ensure_non_negative;

fn pensionable_salary(
    rates: &StatutoryRates,
    gross_salary: Decimal,
    basic_salary: Decimal,
) -> Decimal {
    match rates.nssf.basis() {
        PensionableBasis::Gross => gross_salary,
        PensionableBasis::Basic => basic_salary,
    }
}

/// Computes PAYE, NHIF, NSSF and the housing levy for one month's pay.
///
/// Every component is computed independently from the same inputs; PAYE is
/// charged on the full gross without relief for the other contributions.
/// Audit steps are numbered 1 to 4 in that order.
///
/// # Errors
///
/// Returns `InvalidInput` if either salary is negative.
pub fn compute_all_statutory_deductions(
    gross_salary: Decimal,
    basic_salary: Decimal,
    rates: &StatutoryRates,
) -> EngineResult<DeductionResult> {
    let start_time = Instant::now();
    ensure_non_negative("gross_salary", gross_salary)?;
    ensure_non_negative("basic_salary", basic_salary)?;

    let paye = calculate_paye(gross_salary, &rates.paye, 1)?;
    let nhif = calculate_nhif(gross_salary, &rates.nhif, 2)?;
    let nssf = calculate_nssf(
        pensionable_salary(rates, gross_salary, basic_salary),
        &rates.nssf,
        3,
    )?;
    let housing_levy = calculate_housing_levy(gross_salary, &rates.housing_levy, 4)?;

    let total_statutory = paye.amount + nhif.amount + nssf.amount + housing_levy.amount;
    let net_after_statutory = gross_salary - total_statutory;
    let duration_us = start_time.elapsed().as_micros() as u64;

    debug!(
        rates_effective_date = %rates.effective_date,
        gross_salary = %gross_salary,
        paye = %paye.amount,
        nhif = %nhif.amount,
        nssf = %nssf.amount,
        housing_levy = %housing_levy.amount,
        total_statutory = %total_statutory,
        duration_us,
        "Statutory deductions computed"
    );

    Ok(DeductionResult {
        rates_effective_date: rates.effective_date,
        gross_salary,
        basic_salary,
        paye_tax: paye.amount,
        nhif: nhif.amount,
        nssf: nssf.amount,
        housing_levy: housing_levy.amount,
        total_statutory,
        net_after_statutory,
        audit_trace: AuditTrace {
            steps: vec![
                paye.audit_step,
                nhif.audit_step,
                nssf.audit_step,
                housing_levy.audit_step,
            ],
            duration_us,
        },
    })
}

/// Computes a single statutory component.
pub fn compute_component(
    component: StatutoryComponent,
    gross_salary: Decimal,
    basic_salary: Decimal,
    rates: &StatutoryRates,
) -> EngineResult<Decimal> {
    match component {
        StatutoryComponent::Paye => compute_paye(gross_salary, &rates.paye),
        StatutoryComponent::Nhif => compute_nhif(gross_salary, &rates.nhif),
        StatutoryComponent::Nssf => {
            ensure_non_negative("gross_salary", gross_salary)?;
            compute_nssf(
                pensionable_salary(rates, gross_salary, basic_salary),
                &rates.nssf,
            )
        }
        StatutoryComponent::HousingLevy => {
            compute_housing_levy(gross_salary, &rates.housing_levy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        HousingLevyConfig, NhifBracketRow, NhifTable, NssfScheme, PayeBand, PayeConfig,
        TaxSchedule,
    };
    use crate::error::EngineError;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_rates() -> StatutoryRates {
        let nhif_rows = [
            ("0", "5999", "150"),
            ("6000", "7999", "300"),
            ("8000", "11999", "400"),
            ("12000", "14999", "500"),
            ("15000", "19999", "600"),
            ("20000", "24999", "750"),
            ("25000", "29999", "850"),
            ("30000", "34999", "900"),
            ("35000", "39999", "950"),
            ("40000", "44999", "1000"),
            ("45000", "49999", "1100"),
            ("50000", "59999", "1200"),
            ("60000", "69999", "1300"),
            ("70000", "79999", "1400"),
            ("80000", "89999", "1500"),
            ("90000", "99999", "1600"),
        ];
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
                        upper_bound: Some(dec("388000")),
                        rate: dec("0.25"),
                    },
                    PayeBand {
                        upper_bound: Some(dec("6000000")),
                        rate: dec("0.30"),
                    },
                    PayeBand {
                        upper_bound: None,
                        rate: dec("0.35"),
                    },
                ])
                .unwrap(),
            },
            nhif: NhifTable {
                rows: nhif_rows
                    .iter()
                    .map(|(min, max, amount)| NhifBracketRow {
                        min: dec(min),
                        max: dec(max),
                        amount: dec(amount),
                    })
                    .collect(),
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

    #[test]
    fn test_150k_gross() {
        let rates = create_test_rates();
        let result =
            compute_all_statutory_deductions(dec("150000"), dec("120000"), &rates).unwrap();

        assert_eq!(result.paye_tax, dec("39063"));
        assert_eq!(result.nhif, dec("1700"));
        assert_eq!(result.nssf, dec("2160"));
        assert_eq!(result.housing_levy, dec("2250"));
        assert_eq!(result.total_statutory, dec("45173"));
        assert_eq!(result.net_after_statutory, dec("104827"));
        assert_eq!(result.rates_effective_date, rates.effective_date);
    }

    #[test]
    fn test_50k_gross() {
        let rates = create_test_rates();
        let result = compute_all_statutory_deductions(dec("50000"), dec("40000"), &rates).unwrap();

        // 600,000 - 28,800 = 571,200; 53,800 + 183,200 x 30% = 108,760 / 12 = 9,063.33
        assert_eq!(result.paye_tax, dec("9063"));
        assert_eq!(result.nhif, dec("1200"));
        assert_eq!(result.nssf, dec("2160"));
        assert_eq!(result.housing_levy, dec("750"));
        assert_eq!(result.total_statutory, dec("13173"));
        assert_eq!(result.net_after_statutory, dec("36827"));
    }

    #[test]
    fn test_audit_steps_in_order() {
        let rates = create_test_rates();
        let result = compute_all_statutory_deductions(dec("50000"), dec("40000"), &rates).unwrap();

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(rule_ids, vec!["paye", "nhif", "nssf", "housing_levy"]);

        let numbers: Vec<u32> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_gross() {
        let rates = create_test_rates();
        let result =
            compute_all_statutory_deductions(Decimal::ZERO, Decimal::ZERO, &rates).unwrap();

        assert_eq!(result.paye_tax, Decimal::ZERO);
        assert_eq!(result.nhif, dec("150"));
        assert_eq!(result.nssf, Decimal::ZERO);
        assert_eq!(result.housing_levy, Decimal::ZERO);
        assert_eq!(result.net_after_statutory, dec("-150"));
    }

    #[test]
    fn test_nssf_on_basic_salary() {
        let mut rates = create_test_rates();
        rates.nssf = NssfScheme::Flat {
            ceiling: dec("36000"),
            rate: dec("0.06"),
            basis: PensionableBasis::Basic,
        };

        let result = compute_all_statutory_deductions(dec("50000"), dec("20000"), &rates).unwrap();
        assert_eq!(result.nssf, dec("1200"));
        assert_eq!(
            compute_component(StatutoryComponent::Nssf, dec("50000"), dec("20000"), &rates)
                .unwrap(),
            dec("1200")
        );
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let rates = create_test_rates();
        match compute_all_statutory_deductions(dec("-1"), Decimal::ZERO, &rates) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "gross_salary"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        match compute_all_statutory_deductions(dec("1000"), dec("-1"), &rates) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "basic_salary"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_compute_component_matches_combined_result() {
        let rates = create_test_rates();
        let gross = dec("87654.32");
        let basic = dec("70000");
        let result = compute_all_statutory_deductions(gross, basic, &rates).unwrap();

        for component in [
            StatutoryComponent::Paye,
            StatutoryComponent::Nhif,
            StatutoryComponent::Nssf,
            StatutoryComponent::HousingLevy,
        ] {
            assert_eq!(
                compute_component(component, gross, basic, &rates).unwrap(),
                result.component(component)
            );
        }
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_components(cents in 0i64..50_000_000_00) {
            let rates = create_test_rates();
            let gross = Decimal::new(cents, 2);
            let result = compute_all_statutory_deductions(gross, gross, &rates).unwrap();

            prop_assert_eq!(
                result.total_statutory,
                result.paye_tax + result.nhif + result.nssf + result.housing_levy
            );
            prop_assert_eq!(result.net_after_statutory, gross - result.total_statutory);
            prop_assert!(result.paye_tax >= Decimal::ZERO);
            prop_assert!(result.nssf >= Decimal::ZERO);
        }
    }
}
