//! Statutory deduction calculations.
//!
//! This module contains the PAYE, NHIF, NSSF and housing levy calculators,
//! the combined [`compute_all_statutory_deductions`] entry point, and the
//! validator for manually entered deduction amounts. Every function here is
//! pure: rates come in as arguments and nothing is cached between calls.

mod deduction_validation;
mod housing_levy;
mod nhif;
mod nssf;
mod paye;
mod rounding;
mod statutory;

pub use deduction_validation::{DeductionContext, validate_deduction_amount};
pub use housing_levy::{
    HOUSING_LEVY_LEGAL_REF, HousingLevyResult, calculate_housing_levy, compute_housing_levy,
};
pub use nhif::{NHIF_LEGAL_REF, NhifResult, calculate_nhif, compute_nhif};
pub use nssf::{NSSF_LEGAL_REF, NssfResult, calculate_nssf, compute_nssf};
pub use paye::{PAYE_LEGAL_REF, PayeResult, calculate_paye, compute_paye};
pub use rounding::round_to_shilling;
pub use statutory::{compute_all_statutory_deductions, compute_component};
