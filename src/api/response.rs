//! Response types for the payroll API.
//!
//! This module defines the error body returned by every endpoint and the
//! mapping from [`EngineError`] to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ValidationError, ValidationIssue};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The request field the error refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Days left on the balance, for `INSUFFICIENT_BALANCE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Decimal>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            field: None,
            remaining: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Tags the error with the field it refers to.
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing actor error response.
    pub fn missing_actor(header: &str) -> Self {
        Self::with_details(
            "MISSING_ACTOR",
            format!("missing header: {}", header),
            format!("The '{}' header must identify the approver", header),
        )
        .for_field(header)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        let (code, remaining) = match &error {
            ValidationError::InsufficientBalance { remaining, .. } => {
                ("INSUFFICIENT_BALANCE", Some(remaining.normalize()))
            }
            _ => ("VALIDATION_ERROR", None),
        };
        let body = ApiError {
            remaining,
            ..ApiError::with_details(code, error.user_message(), error.to_string())
                .for_field(error.field())
        };
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, body)
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::RatesNotFound { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "RATES_NOT_FOUND",
                    message,
                    "No statutory rate schedule covers the requested pay date",
                )
                .for_field("pay_date"),
            ),
            EngineError::InvalidInput { field, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_INPUT", message).for_field(field),
            ),
            EngineError::UnknownDeductionType { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("UNKNOWN_DEDUCTION_TYPE", message).for_field("deduction_type"),
            ),
            EngineError::Validation(validation) => validation.into(),
            EngineError::InvalidTransition { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("INVALID_TRANSITION", message),
            ),
            EngineError::BalanceNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("BALANCE_NOT_FOUND", message).for_field("leave_type"),
            ),
            EngineError::LeaveRequestNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("LEAVE_REQUEST_NOT_FOUND", message),
            ),
            EngineError::EmployeeNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message).for_field("employee_id"),
            ),
        }
    }
}

/// Response body for `POST /deductions/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionValidationResponse {
    /// True if any issue has `Error` severity.
    pub blocking: bool,
    /// Every issue found, in the order checked.
    pub issues: Vec<ValidationIssue>,
}

impl From<Vec<ValidationIssue>> for DeductionValidationResponse {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self {
            blocking: issues.iter().any(ValidationIssue::is_blocking),
            issues,
        }
    }
}
