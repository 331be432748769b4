//! HTTP API module for the payroll engine.
//!
//! A thin axum embedding of the statutory calculator and the leave
//! workflow. Handlers take the store lock for the whole of each leave
//! operation, so approvals against the same balance never interleave.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, ACTOR_HEADER};
pub use request::{
    DeductionValidationRequest, LeaveRequestBody, RejectLeaveRequest, StatutoryDeductionRequest,
};
pub use response::{ApiError, DeductionValidationResponse};
pub use state::AppState;
