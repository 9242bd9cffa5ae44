//! HTTP request handlers for the scheduling API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Schedule, Shift, ShiftPerformance};

use super::request::{
    AssignTrainingRequest, CompleteTrainingRequest, CreateScheduleRequest, ReviewRequest,
};
use super::response::{ApiError, ApiErrorResponse, CancelShiftResponse, CreateScheduleResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/:id/publish", post(publish_schedule))
        .route("/shifts/active", get(active_shifts))
        .route("/shifts/:id/start", post(start_shift))
        .route("/shifts/:id/complete", post(complete_shift))
        .route("/shifts/:id/cancel", post(cancel_shift))
        .route("/templates", get(list_templates))
        .route("/training/programs", get(list_programs))
        .route("/training", post(assign_training))
        .route("/training/:id/complete", post(complete_training))
        .route("/reviews", post(conduct_review))
        .route("/employees/:id/performance", get(employee_performance))
        .route("/metrics", get(team_metrics))
        .route("/events", get(drain_events))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's description of the problem
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::bad_request(error))
        }
    }
}

/// Logs an engine failure and converts it for the response.
fn engine_failure(correlation_id: Uuid, err: crate::error::EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        kind = err.kind(),
        error = %err,
        "Request failed"
    );
    err.into()
}

/// Handler for GET /schedules.
async fn list_schedules(State(state): State<AppState>) -> Json<Vec<Schedule>> {
    let engine = state.engine().await;
    Json(engine.get_schedules().to_vec())
}

/// Handler for POST /schedules.
///
/// Responds 201 with the new schedule, or 200 with `created: false` when
/// nobody on the roster can be scheduled.
async fn create_schedule(
    State(state): State<AppState>,
    payload: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule creation request");
    let request = parse_body(correlation_id, payload)?;

    let mut engine = state.engine().await;
    let schedule = engine
        .create_weekly_schedule(request.week_start, &request.options)
        .cloned();

    let status = match &schedule {
        Some(schedule) => {
            info!(
                correlation_id = %correlation_id,
                schedule_id = %schedule.id,
                shifts = schedule.shifts.len(),
                flags = schedule.flags.len(),
                "Schedule created"
            );
            StatusCode::CREATED
        }
        None => {
            warn!(
                correlation_id = %correlation_id,
                week_start = %request.week_start,
                "No schedulable employees"
            );
            StatusCode::OK
        }
    };
    Ok((
        status,
        Json(CreateScheduleResponse {
            created: schedule.is_some(),
            schedule,
        }),
    ))
}

/// Handler for POST /schedules/{id}/publish.
async fn publish_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> ApiResult<Json<Schedule>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, schedule_id = %schedule_id, "Publishing schedule");
    let mut engine = state.engine().await;
    engine
        .publish_schedule(&schedule_id)
        .cloned()
        .map(Json)
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Handler for GET /shifts/active.
async fn active_shifts(State(state): State<AppState>) -> Json<Vec<Shift>> {
    let engine = state.engine().await;
    Json(engine.get_active_shifts().into_iter().cloned().collect())
}

/// Handler for POST /shifts/{id}/start.
async fn start_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
) -> ApiResult<Json<Shift>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Starting shift");
    let mut engine = state.engine().await;
    engine
        .start_shift(&shift_id)
        .cloned()
        .map(Json)
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Handler for POST /shifts/{id}/complete.
async fn complete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
) -> ApiResult<Json<ShiftPerformance>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Completing shift");
    let mut engine = state.engine().await;
    engine
        .complete_shift(&shift_id)
        .map(Json)
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Handler for POST /shifts/{id}/cancel.
async fn cancel_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
) -> ApiResult<Json<CancelShiftResponse>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Cancelling shift");
    let mut engine = state.engine().await;
    let released_employees = engine
        .cancel_shift(&shift_id)
        .map_err(|err| engine_failure(correlation_id, err))?;
    Ok(Json(CancelShiftResponse {
        shift_id,
        released_employees,
    }))
}

/// Handler for GET /templates.
async fn list_templates(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine().await;
    Json(engine.get_shift_templates().to_vec())
}

/// Handler for GET /training/programs.
async fn list_programs(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine().await;
    Json(engine.get_training_programs().to_vec())
}

/// Handler for POST /training.
async fn assign_training(
    State(state): State<AppState>,
    payload: Result<Json<AssignTrainingRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing training assignment");
    let request = parse_body(correlation_id, payload)?;

    let mut engine = state.engine().await;
    let record = engine
        .assign_training(&request.employee_id, &request.program_id)
        .map_err(|err| engine_failure(correlation_id, err))?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for POST /training/{id}/complete.
async fn complete_training(
    State(state): State<AppState>,
    Path(training_id): Path<String>,
    payload: Result<Json<CompleteTrainingRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, training_id = %training_id, "Completing training");
    let request = parse_body(correlation_id, payload)?;

    let mut engine = state.engine().await;
    engine
        .complete_training(&training_id, request.score)
        .map(Json)
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Handler for POST /reviews.
async fn conduct_review(
    State(state): State<AppState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing performance review");
    let request = parse_body(correlation_id, payload)?;

    let mut engine = state.engine().await;
    let review = engine
        .conduct_performance_review(&request.employee_id, request.period)
        .map_err(|err| engine_failure(correlation_id, err))?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for GET /employees/{id}/performance.
async fn employee_performance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let engine = state.engine().await;
    engine
        .get_employee_performance(&employee_id)
        .map(Json)
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Handler for GET /metrics.
async fn team_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.engine().await;
    Json(engine.get_team_metrics())
}

/// Handler for GET /events. Returns and clears the buffered domain events.
async fn drain_events(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.engine().await;
    Json(engine.drain_events())
}
