//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! [`EngineError`] covers configuration, input and workflow failures, while
//! [`ValidationError`] and [`ValidationIssue`] carry field-tagged business-rule
//! outcomes that callers are expected to render rather than treat as faults.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{LeaveStatus, LeaveType};

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use kenya_payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a structural rule.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the violated rule.
        message: String,
    },

    /// No statutory rate set is effective on the requested date.
    #[error("No statutory rates effective on {date}")]
    RatesNotFound {
        /// The date for which rates were requested.
        date: NaiveDate,
    },

    /// A calculation input was negative or otherwise unusable.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input that was rejected.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A deduction type code is not present in the catalogue.
    #[error("Unknown deduction type: {code}")]
    UnknownDeductionType {
        /// The code that was not found.
        code: String,
    },

    /// A leave request failed a business rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A leave request is not in a state that allows the requested action.
    #[error("Leave request {request_id} is already {status}")]
    InvalidTransition {
        /// The request that was acted upon.
        request_id: Uuid,
        /// The status the request is currently in.
        status: LeaveStatus,
    },

    /// No balance record exists for the employee and leave type.
    #[error("No {leave_type} leave balance for employee '{employee_id}'")]
    BalanceNotFound {
        /// The employee identifier.
        employee_id: String,
        /// The leave type.
        leave_type: LeaveType,
    },

    /// No leave request exists with the given id.
    #[error("Leave request not found: {id}")]
    LeaveRequestNotFound {
        /// The missing request id.
        id: Uuid,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The missing employee id.
        id: String,
    },
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`EngineError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// How strongly a validation issue should be treated.
///
/// `Error` blocks the action being validated; `Warning` is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the save or state transition.
    Error,
    /// Surfaced to the user, never blocking.
    Warning,
}

/// A single field-tagged finding produced by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The input field the issue refers to.
    pub field: String,
    /// A human-readable description.
    pub message: String,
    /// Whether the issue blocks the action.
    pub severity: Severity,
}

impl ValidationIssue {
    /// Creates an issue with [`Severity::Error`].
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates an issue with [`Severity::Warning`].
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Returns true if the issue blocks the action.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Business-rule failures raised by the leave request workflow.
///
/// Every variant is tied to one input field so that a form can highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The leave type string is not a recognised leave type.
    #[error("Unrecognised leave type: {value}")]
    UnknownLeaveType {
        /// The value supplied by the caller.
        value: String,
    },

    /// No start date was supplied.
    #[error("Start date is required")]
    MissingStartDate,

    /// The start date lies before the submission date.
    #[error("Start date {start_date} is in the past (today is {today})")]
    StartDateInPast {
        /// The requested start date.
        start_date: NaiveDate,
        /// The submission date.
        today: NaiveDate,
    },

    /// No end date was supplied.
    #[error("End date is required")]
    MissingEndDate,

    /// The end date lies before the start date.
    #[error("End date {end_date} is before start date {start_date}")]
    EndBeforeStart {
        /// The requested start date.
        start_date: NaiveDate,
        /// The requested end date.
        end_date: NaiveDate,
    },

    /// The reason was empty or whitespace.
    #[error("Reason is required")]
    MissingReason,

    /// The rejection reason was empty or whitespace.
    #[error("A reason is required to reject a leave request")]
    MissingRejectionReason,

    /// The balance supplied does not belong to the request's employee and leave type.
    #[error("Balance is for {balance_employee_id}/{balance_leave_type}, not {employee_id}/{leave_type}")]
    BalanceMismatch {
        /// The request's employee.
        employee_id: String,
        /// The request's leave type.
        leave_type: LeaveType,
        /// The balance record's employee.
        balance_employee_id: String,
        /// The balance record's leave type.
        balance_leave_type: LeaveType,
    },

    /// Not enough days remain to cover the request.
    #[error("Insufficient leave balance: requested {requested} days, {remaining} remaining")]
    InsufficientBalance {
        /// Days the request needs.
        requested: u32,
        /// Days left on the balance.
        remaining: Decimal,
    },
}

impl ValidationError {
    /// The input field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownLeaveType { .. } | Self::BalanceMismatch { .. } => "leave_type",
            Self::MissingStartDate | Self::StartDateInPast { .. } => "start_date",
            Self::MissingEndDate | Self::EndBeforeStart { .. } => "end_date",
            Self::MissingReason | Self::MissingRejectionReason => "reason",
            Self::InsufficientBalance { .. } => "days_requested",
        }
    }

    /// Workflow validation errors always block the transition.
    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// A message suitable for showing next to the field.
    pub fn user_message(&self) -> String {
        match self {
            Self::InsufficientBalance { remaining, .. } => {
                format!("You have {} days remaining.", remaining.normalize())
            }
            other => other.to_string(),
        }
    }

    /// Converts the error into a [`ValidationIssue`].
    pub fn to_issue(&self) -> ValidationIssue {
        ValidationIssue {
            field: self.field().to_string(),
            message: self.user_message(),
            severity: self.severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("gross_salary", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid input 'gross_salary': must not be negative"
        );
    }

    #[test]
    fn test_rates_not_found_displays_date() {
        let error = EngineError::RatesNotFound {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(error.to_string(), "No statutory rates effective on 2020-01-01");
    }

    #[test]
    fn test_invalid_transition_displays_status() {
        let error = EngineError::InvalidTransition {
            request_id: Uuid::nil(),
            status: LeaveStatus::Approved,
        };
        assert_eq!(
            error.to_string(),
            "Leave request 00000000-0000-0000-0000-000000000000 is already approved"
        );
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let error: EngineError = ValidationError::MissingReason.into();
        assert_eq!(error.to_string(), "Reason is required");
    }

    #[test]
    fn test_insufficient_balance_user_message_has_remaining() {
        let error = ValidationError::InsufficientBalance {
            requested: 10,
            remaining: Decimal::new(450, 2),
        };
        assert_eq!(error.field(), "days_requested");
        assert_eq!(error.user_message(), "You have 4.5 days remaining.");

        let issue = error.to_issue();
        assert_eq!(issue.severity, Severity::Error);
        assert!(issue.is_blocking());
    }

    #[test]
    fn test_validation_error_fields() {
        assert_eq!(ValidationError::MissingStartDate.field(), "start_date");
        assert_eq!(ValidationError::MissingEndDate.field(), "end_date");
        assert_eq!(ValidationError::MissingReason.field(), "reason");
        assert_eq!(
            ValidationError::UnknownLeaveType {
                value: "holiday".to_string()
            }
            .field(),
            "leave_type"
        );
    }

    #[test]
    fn test_warning_issue_is_not_blocking() {
        let issue = ValidationIssue::warning("amount", "differs from calculated value");
        assert!(!issue.is_blocking());
        assert_eq!(
            serde_json::to_value(&issue).unwrap()["severity"],
            serde_json::json!("warning")
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
        assert_error::<ValidationError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn fails_validation() -> Result<(), ValidationError> {
            Err(ValidationError::MissingStartDate)
        }

        fn propagates_error() -> EngineResult<()> {
            fails_validation()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(EngineError::Validation(ValidationError::MissingStartDate))
        ));
    }
}
