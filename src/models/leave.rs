//! Leave balance and leave request models.
//!
//! A [`LeaveBalance`] tracks one employee's days for one [`LeaveType`].
//! Its fields are private so that `remaining == entitlement + carry_forward - used`
//! holds at all times; the only way to consume days is through the approval
//! step of the leave workflow.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, ValidationError};

/// The kinds of leave recognised under the Employment Act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid annual leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Compassionate (bereavement) leave.
    Compassionate,
}

impl LeaveType {
    /// All leave types, in declaration order.
    pub const ALL: [LeaveType; 5] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Maternity,
        LeaveType::Paternity,
        LeaveType::Compassionate,
    ];

    /// The snake_case identifier used in configuration and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
            LeaveType::Compassionate => "compassionate",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        LeaveType::ALL
            .into_iter()
            .find(|lt| lt.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownLeaveType {
                value: s.to_string(),
            })
    }
}

/// Lifecycle status of a submitted leave request.
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting an approver's decision.
    Pending,
    /// Approved; the balance has been decremented.
    Approved,
    /// Rejected; the balance is untouched.
    Rejected,
}

impl LeaveStatus {
    /// Returns true once the request has been resolved.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        })
    }
}

/// Serialized shape of a [`LeaveBalance`]; `remaining` is optional on input.
#[derive(Debug, Clone, Deserialize)]
struct LeaveBalanceRecord {
    employee_id: String,
    leave_type: LeaveType,
    entitlement: Decimal,
    #[serde(default)]
    used: Decimal,
    #[serde(default)]
    remaining: Option<Decimal>,
    #[serde(default)]
    carry_forward: Decimal,
}

impl TryFrom<LeaveBalanceRecord> for LeaveBalance {
    type Error = EngineError;

    fn try_from(record: LeaveBalanceRecord) -> EngineResult<Self> {
        let balance = LeaveBalance::new(
            record.employee_id,
            record.leave_type,
            record.entitlement,
            record.carry_forward,
        )?
        .with_used(record.used)?;

        match record.remaining {
            Some(remaining) if remaining != balance.remaining => Err(EngineError::invalid_input(
                "remaining",
                format!(
                    "expected {} (entitlement + carry_forward - used), got {}",
                    balance.remaining, remaining
                ),
            )),
            _ => Ok(balance),
        }
    }
}

/// Days available to one employee for one leave type.
///
/// # Example
///
/// ```
/// use kenya_payroll_engine::models::{LeaveBalance, LeaveType};
/// use rust_decimal::Decimal;
///
/// let balance = LeaveBalance::new("emp_001", LeaveType::Annual, Decimal::from(21), Decimal::from(4))
///     .unwrap()
///     .with_used(Decimal::from(5))
///     .unwrap();
/// assert_eq!(balance.remaining(), Decimal::from(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeaveBalanceRecord")]
pub struct LeaveBalance {
    employee_id: String,
    leave_type: LeaveType,
    entitlement: Decimal,
    used: Decimal,
    remaining: Decimal,
    carry_forward: Decimal,
}

impl LeaveBalance {
    /// Creates an unused balance.
    ///
    /// Fails with `InvalidInput` if `entitlement` or `carry_forward` is negative.
    pub fn new(
        employee_id: impl Into<String>,
        leave_type: LeaveType,
        entitlement: Decimal,
        carry_forward: Decimal,
    ) -> EngineResult<Self> {
        if entitlement < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "entitlement",
                "must not be negative",
            ));
        }
        if carry_forward < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "carry_forward",
                "must not be negative",
            ));
        }

        Ok(Self {
            employee_id: employee_id.into(),
            leave_type,
            entitlement,
            used: Decimal::ZERO,
            remaining: entitlement + carry_forward,
            carry_forward,
        })
    }

    /// Returns the balance with `used` days already consumed.
    ///
    /// Fails with `InvalidInput` if `used` is negative or exceeds the available days.
    pub fn with_used(mut self, used: Decimal) -> EngineResult<Self> {
        if used < Decimal::ZERO {
            return Err(EngineError::invalid_input("used", "must not be negative"));
        }
        let available = self.entitlement + self.carry_forward;
        if used > available {
            return Err(EngineError::invalid_input(
                "used",
                format!("{} exceeds the {} days available", used, available),
            ));
        }
        self.used = used;
        self.remaining = available - used;
        Ok(self)
    }

    /// The employee this balance belongs to.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// The leave type this balance tracks.
    pub fn leave_type(&self) -> LeaveType {
        self.leave_type
    }

    /// Days granted for the current period.
    pub fn entitlement(&self) -> Decimal {
        self.entitlement
    }

    /// Days consumed by approved requests.
    pub fn used(&self) -> Decimal {
        self.used
    }

    /// Days still available.
    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    /// Days brought forward from the previous period.
    pub fn carry_forward(&self) -> Decimal {
        self.carry_forward
    }

    /// Returns true if at least `days` remain.
    pub fn covers(&self, days: u32) -> bool {
        self.remaining >= Decimal::from(days)
    }

    /// Consumes `days` from the balance.
    pub(crate) fn consume(&mut self, days: u32) -> Result<(), ValidationError> {
        if !self.covers(days) {
            return Err(ValidationError::InsufficientBalance {
                requested: days,
                remaining: self.remaining,
            });
        }
        let days = Decimal::from(days);
        self.used += days;
        self.remaining -= days;
        Ok(())
    }
}

/// A leave application as entered by the employee, before submission.
///
/// This is the `Draft` state of the workflow. Dates are optional because a
/// form can be submitted with them missing; `days_requested` is deliberately
/// absent since it is always derived from the dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// The applying employee.
    pub employee_id: String,
    /// Leave type as entered; parsed during submission.
    pub leave_type: String,
    /// First day of leave.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of leave (inclusive).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Why the leave is needed.
    #[serde(default)]
    pub reason: String,
}

/// A submitted leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The applying employee.
    pub employee_id: String,
    /// The leave type.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Calendar days covered, inclusive of both endpoints.
    pub days_requested: u32,
    /// Why the leave is needed.
    pub reason: String,
    /// Current lifecycle status.
    pub status: LeaveStatus,
    /// When the request was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Who approved or rejected the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    /// When the request was approved or rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    /// Why the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl LeaveRequest {
    /// Returns true while the request awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }
}
