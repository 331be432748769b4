//! Leave request workflow.
//!
//! [`submit`], [`approve`] and [`reject`] move a request through
//! `Pending -> Approved | Rejected`. Balances come from an injected
//! [`LeaveBalanceRepository`](crate::repository::LeaveBalanceRepository).
//! [`accrue_entitlement`] and [`open_balance`] set balances up for a new
//! leave year.

mod accrual;
mod days;
mod workflow;

pub use accrual::{accrue_entitlement, open_balance};
pub use days::inclusive_day_count;
pub use workflow::{
    approve, reject, submission_date, submit, submit_validated, validate_application,
    ValidatedApplication, EAT_UTC_OFFSET_SECS,
};
