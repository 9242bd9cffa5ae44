//! Request types for the scheduling API.
//!
//! This module defines the JSON request bodies accepted by the mutating
//! endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ReviewPeriod, ScheduleOptions};

/// Request body for `POST /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// Any day in the week to schedule. Normalized to its Monday.
    pub week_start: NaiveDate,
    /// Creation options. Omitted flags default to false.
    #[serde(default)]
    pub options: ScheduleOptions,
}

/// Request body for `POST /training`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTrainingRequest {
    /// The employee to enrol.
    pub employee_id: String,
    /// The program to enrol them in.
    pub program_id: String,
}

/// Request body for `POST /training/{id}/complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTrainingRequest {
    /// Final score, 0-100.
    pub score: f64,
}

/// Request body for `POST /reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// The employee to review.
    pub employee_id: String,
    /// Look-back window.
    #[serde(default = "default_period")]
    pub period: ReviewPeriod,
}

fn default_period() -> ReviewPeriod {
    ReviewPeriod::Monthly
}
