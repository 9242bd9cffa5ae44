//! HTTP API module for the scheduling engine.
//!
//! This module exposes schedule creation, the shift lifecycle, training,
//! reviews and team metrics as a REST API over a shared engine.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AssignTrainingRequest, CompleteTrainingRequest, CreateScheduleRequest, ReviewRequest,
};
pub use response::{ApiError, ApiErrorResponse, CancelShiftResponse, CreateScheduleResponse};
pub use state::AppState;
