//! Response types for the scheduling API.
//!
//! This module defines the error body, its mapping from [`EngineError`] to
//! HTTP status codes, and the few response bodies that are not plain
//! domain models.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Schedule;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                return ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                };
            }
            EngineError::EmployeeNotFound { .. }
            | EngineError::TemplateNotFound { .. }
            | EngineError::TrainingProgramNotFound { .. }
            | EngineError::TrainingNotFound { .. }
            | EngineError::ShiftNotFound { .. }
            | EngineError::ScheduleNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::InvalidTransition { .. }
            | EngineError::ScheduleNotDraft { .. }
            | EngineError::TrainingAlreadyCompleted { .. }
            | EngineError::AssignmentRejected { .. } => StatusCode::CONFLICT,
            EngineError::InvalidTemplate { .. }
            | EngineError::InvalidWeek { .. }
            | EngineError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        };
        ApiErrorResponse {
            status,
            error: ApiError::new(error.kind(), error.to_string()),
        }
    }
}

/// Body returned by `POST /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleResponse {
    /// False when nobody on the roster could be scheduled.
    pub created: bool,
    /// The new schedule, if one was created.
    pub schedule: Option<Schedule>,
}

/// Body returned by `POST /shifts/{id}/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelShiftResponse {
    /// The cancelled shift.
    pub shift_id: String,
    /// Employees whose hours were released.
    pub released_employees: Vec<String>,
}
