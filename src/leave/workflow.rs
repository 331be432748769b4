//! Leave request lifecycle: submit, approve, reject.
//!
//! A request is created `Pending` once it passes validation and moves to
//! `Approved` or `Rejected` exactly once. Submission does not reserve days;
//! the balance is only consumed on approval, and approval re-checks it so
//! `remaining` can never go negative.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, ValidationError};
use crate::models::{LeaveApplication, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType};
use crate::repository::LeaveBalanceRepository;

use super::days::inclusive_day_count;

/// Offset of East Africa Time from UTC. Kenya observes no daylight saving.
pub const EAT_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// The calendar date in Nairobi at `at`.
///
/// Start dates are compared against this, not the UTC date, so a request
/// sent shortly after local midnight cannot start yesterday.
pub fn submission_date(at: DateTime<Utc>) -> NaiveDate {
    match FixedOffset::east_opt(EAT_UTC_OFFSET_SECS) {
        Some(eat) => at.with_timezone(&eat).date_naive(),
        None => at.date_naive(),
    }
}

/// An application that passed every check that does not need a balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedApplication {
    /// The applying employee.
    pub employee_id: String,
    /// The parsed leave type.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Inclusive calendar day count.
    pub days_requested: u32,
    /// Trimmed reason.
    pub reason: String,
}

/// Runs checks 1-5 of [`submit`]. Stores use this to reject a bad
/// application before looking up a balance.
pub fn validate_application(
    application: &LeaveApplication,
    submitted_at: DateTime<Utc>,
) -> Result<ValidatedApplication, ValidationError> {
    let leave_type: LeaveType = application.leave_type.parse()?;

    let start_date = application
        .start_date
        .ok_or(ValidationError::MissingStartDate)?;
    let today = submission_date(submitted_at);
    if start_date < today {
        return Err(ValidationError::StartDateInPast { start_date, today });
    }

    let end_date = application.end_date.ok_or(ValidationError::MissingEndDate)?;
    let days_requested = inclusive_day_count(start_date, end_date)?;

    let reason = application.reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::MissingReason);
    }

    Ok(ValidatedApplication {
        employee_id: application.employee_id.clone(),
        leave_type,
        start_date,
        end_date,
        days_requested,
        reason: reason.to_string(),
    })
}

/// Validates an application against the employee's current balance and
/// creates a `Pending` request.
///
/// Checks run in order and stop at the first failure:
///
/// 1. the leave type is recognised
/// 2. a start date is present and not before the submission date in Nairobi
/// 3. an end date is present and not before the start date
/// 4. the reason is not blank
/// 5. the day count is derived from the dates
/// 6. `balance` belongs to the applicant and leave type, and covers the days
///
/// The balance is not modified.
pub fn submit(
    application: &LeaveApplication,
    balance: &LeaveBalance,
    submitted_at: DateTime<Utc>,
) -> Result<LeaveRequest, ValidationError> {
    let validated = validate_application(application, submitted_at)?;
    submit_validated(validated, balance, submitted_at)
}

/// Runs check 6 of [`submit`] on an already validated application.
pub fn submit_validated(
    application: ValidatedApplication,
    balance: &LeaveBalance,
    submitted_at: DateTime<Utc>,
) -> Result<LeaveRequest, ValidationError> {
    let ValidatedApplication {
        employee_id,
        leave_type,
        start_date,
        end_date,
        days_requested,
        reason,
    } = application;

    if balance.employee_id() != employee_id || balance.leave_type() != leave_type {
        return Err(ValidationError::BalanceMismatch {
            employee_id,
            leave_type,
            balance_employee_id: balance.employee_id().to_string(),
            balance_leave_type: balance.leave_type(),
        });
    }
    if !balance.covers(days_requested) {
        return Err(ValidationError::InsufficientBalance {
            requested: days_requested,
            remaining: balance.remaining(),
        });
    }

    let request = LeaveRequest {
        id: Uuid::new_v4(),
        employee_id,
        leave_type,
        start_date,
        end_date,
        days_requested,
        reason,
        status: LeaveStatus::Pending,
        submitted_at,
        decided_by: None,
        decided_at: None,
        rejection_reason: None,
    };

    info!(
        request_id = %request.id,
        employee_id = %request.employee_id,
        leave_type = %leave_type,
        days = days_requested,
        "Leave request submitted"
    );

    Ok(request)
}

fn ensure_pending(request: &LeaveRequest) -> EngineResult<()> {
    if !request.is_pending() {
        warn!(
            request_id = %request.id,
            status = %request.status,
            "Leave request already decided"
        );
        return Err(EngineError::InvalidTransition {
            request_id: request.id,
            status: request.status,
        });
    }
    Ok(())
}

fn ensure_actor(actor: &str) -> EngineResult<()> {
    if actor.trim().is_empty() {
        return Err(EngineError::invalid_input(
            "approver",
            "approver identity is required",
        ));
    }
    Ok(())
}

/// Approves a pending request and consumes its days from the balance store.
///
/// This is the only operation that modifies a leave balance. The returned
/// request is `Approved` and records `approver` and `approved_at`.
///
/// # Errors
///
/// - `InvalidTransition` if the request is not `Pending`
/// - `BalanceNotFound` if the store has no matching balance
/// - `InsufficientBalance` if the balance no longer covers the request; the
///   store is left unchanged
pub fn approve<R>(
    request: &LeaveRequest,
    approver: &str,
    approved_at: DateTime<Utc>,
    balances: &mut R,
) -> EngineResult<LeaveRequest>
where
    R: LeaveBalanceRepository + ?Sized,
{
    ensure_pending(request)?;
    ensure_actor(approver)?;

    let mut balance = balances.get(&request.employee_id, request.leave_type)?;
    balance.consume(request.days_requested)?;
    let remaining = balance.remaining();
    balances.upsert(balance);

    info!(
        request_id = %request.id,
        employee_id = %request.employee_id,
        leave_type = %request.leave_type,
        days = request.days_requested,
        remaining = %remaining,
        approver,
        "Leave request approved"
    );

    Ok(LeaveRequest {
        status: LeaveStatus::Approved,
        decided_by: Some(approver.to_string()),
        decided_at: Some(approved_at),
        ..request.clone()
    })
}

/// Rejects a pending request. The balance is untouched.
///
/// # Errors
///
/// - `InvalidTransition` if the request is not `Pending`
/// - `MissingRejectionReason` if `reason` is blank
pub fn reject(
    request: &LeaveRequest,
    approver: &str,
    reason: &str,
    rejected_at: DateTime<Utc>,
) -> EngineResult<LeaveRequest> {
    ensure_pending(request)?;
    ensure_actor(approver)?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::MissingRejectionReason.into());
    }

    info!(
        request_id = %request.id,
        employee_id = %request.employee_id,
        leave_type = %request.leave_type,
        approver,
        "Leave request rejected"
    );

    Ok(LeaveRequest {
        status: LeaveStatus::Rejected,
        decided_by: Some(approver.to_string()),
        decided_at: Some(rejected_at),
        rejection_reason: Some(reason.to_string()),
        ..request.clone()
    })
}
