//! Request types for the payroll API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LeaveApplication;

/// Request body for `POST /deductions/statutory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutoryDeductionRequest {
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// Monthly basic salary; defaults to the gross.
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Date whose rates apply; defaults to today.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,
}

/// Request body for `POST /deductions/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionValidationRequest {
    /// Deduction type code from the catalogue.
    pub deduction_type: String,
    /// Amount the user entered.
    pub amount: Decimal,
    /// Employee's monthly gross salary.
    pub gross_salary: Decimal,
    /// Employee's monthly basic salary; defaults to the gross.
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Date whose rates apply; defaults to today.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,
}

/// Request body for `POST /leave-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestBody {
    /// The applying employee.
    pub employee_id: String,
    /// Leave type, e.g. "annual".
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
    /// Accepted from older clients and ignored; the day count is always
    /// derived from the dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_requested: Option<u32>,
}

impl From<LeaveRequestBody> for LeaveApplication {
    fn from(body: LeaveRequestBody) -> Self {
        LeaveApplication {
            employee_id: body.employee_id,
            leave_type: body.leave_type,
            start_date: body.start_date,
            end_date: body.end_date,
            reason: body.reason,
        }
    }
}

/// Request body for `POST /leave-requests/{id}/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectLeaveRequest {
    /// Why the request is rejected.
    #[serde(default)]
    pub reason: String,
}
