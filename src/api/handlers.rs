//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    compute_all_statutory_deductions, validate_deduction_amount, DeductionContext,
};
use crate::config::RateProvider;
use crate::models::LeaveApplication;
use crate::repository::LeaveRequestRepository;

use super::request::{
    DeductionValidationRequest, LeaveRequestBody, RejectLeaveRequest, StatutoryDeductionRequest,
};
use super::response::{ApiError, ApiErrorResponse, DeductionValidationResponse};
use super::state::AppState;

/// Header identifying the approver on approve and reject calls.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/deductions/statutory", post(statutory_deductions_handler))
        .route("/deductions/validate", post(validate_deduction_handler))
        .route("/employees/:id/leave-balances", get(leave_balances_handler))
        .route("/leave-requests", post(submit_leave_handler))
        .route("/leave-requests/:id", get(get_leave_request_handler))
        .route("/leave-requests/:id/approve", post(approve_leave_handler))
        .route("/leave-requests/:id/reject", post(reject_leave_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> Response {
    let api_error: ApiErrorResponse = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = api_error.status.as_u16(),
        code = %api_error.error.code,
        error = %api_error.error.message,
        "Request failed"
    );
    json_response(api_error.status, api_error.error)
}

fn bad_request(correlation_id: Uuid, error: ApiError) -> Response {
    error_response(
        correlation_id,
        ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error,
        },
    )
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(bad_request(correlation_id, error))
        }
    }
}

fn parse_request_id(
    path: Result<Path<Uuid>, PathRejection>,
    correlation_id: Uuid,
) -> Result<Uuid, Response> {
    path.map(|Path(id)| id).map_err(|rejection| {
        bad_request(
            correlation_id,
            ApiError::new("INVALID_ID", rejection.body_text()).for_field("id"),
        )
    })
}

fn actor(headers: &HeaderMap, correlation_id: Uuid) -> Result<String, Response> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| bad_request(correlation_id, ApiError::missing_actor(ACTOR_HEADER)))
}

/// Handler for POST /deductions/statutory.
async fn statutory_deductions_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatutoryDeductionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing statutory deduction request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let pay_date = request.pay_date.unwrap_or_else(|| Utc::now().date_naive());
    let basic_salary = request.basic_salary.unwrap_or(request.gross_salary);

    let start_time = Instant::now();
    let result = state
        .config()
        .rates_for(pay_date)
        .and_then(|rates| compute_all_statutory_deductions(request.gross_salary, basic_salary, rates));

    match result {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                pay_date = %pay_date,
                gross_salary = %result.gross_salary,
                total_statutory = %result.total_statutory,
                duration_us = start_time.elapsed().as_micros(),
                "Statutory deductions calculated"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /deductions/validate.
async fn validate_deduction_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeductionValidationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing deduction validation request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let pay_date = request.pay_date.unwrap_or_else(|| Utc::now().date_naive());
    let rates = match config.rates_for(pay_date) {
        Ok(rates) => rates,
        Err(err) => return error_response(correlation_id, err),
    };

    let context = DeductionContext {
        gross_salary: request.gross_salary,
        basic_salary: request.basic_salary.unwrap_or(request.gross_salary),
        rates,
        catalog: config.deductions(),
    };
    let response: DeductionValidationResponse =
        validate_deduction_amount(&request.deduction_type, request.amount, &context).into();

    info!(
        correlation_id = %correlation_id,
        deduction_type = %request.deduction_type,
        issues = response.issues.len(),
        blocking = response.blocking,
        "Deduction validated"
    );
    json_response(StatusCode::OK, response)
}

/// Handler for GET /employees/{id}/leave-balances.
async fn leave_balances_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let balances = state.store().lock().await.leave_balances(&employee_id);
    match balances {
        Ok(balances) => json_response(StatusCode::OK, balances),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /leave-requests.
async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveRequestBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave submission");

    let body = match parse_json(payload, correlation_id) {
        Ok(body) => body,
        Err(response) => return response,
    };
    if let Some(days) = body.days_requested {
        warn!(
            correlation_id = %correlation_id,
            days_requested = days,
            "Ignoring client-supplied days_requested"
        );
    }

    let application: LeaveApplication = body.into();
    let submitted = state
        .store()
        .lock()
        .await
        .submit_leave(&application, Utc::now());

    match submitted {
        Ok(request) => {
            info!(
                correlation_id = %correlation_id,
                request_id = %request.id,
                employee_id = %request.employee_id,
                "Leave request created"
            );
            json_response(StatusCode::CREATED, request)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /leave-requests/{id}.
async fn get_leave_request_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match parse_request_id(path, correlation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let request = state.store().lock().await.requests.get(id);
    match request {
        Ok(request) => json_response(StatusCode::OK, request),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /leave-requests/{id}/approve.
async fn approve_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match parse_request_id(path, correlation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let approver = match actor(&headers, correlation_id) {
        Ok(approver) => approver,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, request_id = %id, approver = %approver, "Processing approval");

    let approved = state
        .store()
        .lock()
        .await
        .approve_leave(id, &approver, Utc::now());

    match approved {
        Ok(request) => json_response(StatusCode::OK, request),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /leave-requests/{id}/reject.
async fn reject_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RejectLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match parse_request_id(path, correlation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let approver = match actor(&headers, correlation_id) {
        Ok(approver) => approver,
        Err(response) => return response,
    };
    let body = match parse_json(payload, correlation_id) {
        Ok(body) => body,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, request_id = %id, approver = %approver, "Processing rejection");

    let rejected = state
        .store()
        .lock()
        .await
        .reject_leave(id, &approver, &body.reason, Utc::now());

    match rejected {
        Ok(request) => json_response(StatusCode::OK, request),
        Err(err) => error_response(correlation_id, err),
    }
}
