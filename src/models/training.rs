//! Training programs and per-employee training records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A course an employee can be enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgram {
    /// Unique identifier for the program.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Skill points granted at full effectiveness, per skill.
    pub skill_boosts: BTreeMap<String, f64>,
    /// Overall rating points granted at full effectiveness.
    #[serde(default)]
    pub rating_boost: f64,
    /// Classroom hours.
    pub duration_hours: Decimal,
    /// Cost per enrolment.
    #[serde(default)]
    pub cost: Decimal,
}

/// Progress of a training record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    /// Enrolled, not yet finished.
    Assigned,
    /// Finished and scored.
    Completed,
}

/// One employee's enrolment in a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The enrolled employee.
    pub employee_id: String,
    /// The program.
    pub program_id: String,
    /// Progress.
    pub status: TrainingStatus,
    /// Final score (0-100) once completed.
    #[serde(default)]
    pub score: Option<f64>,
    /// When the employee was enrolled.
    pub assigned_at: DateTime<Utc>,
    /// When the training was completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TrainingRecord {
    /// Returns true if the record was completed at or after `since`.
    pub fn completed_since(&self, since: DateTime<Utc>) -> bool {
        self.completed_at.is_some_and(|at| at >= since)
    }
}
