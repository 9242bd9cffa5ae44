//! Domain events returned to callers instead of being published on a bus.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{RatingBucket, Role};

/// Something the engine did that collaborators may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DomainEvent {
    /// A weekly schedule was created and stored.
    #[serde(rename = "schedule.created")]
    ScheduleCreated {
        /// The new schedule.
        schedule_id: String,
        /// Its first day.
        week_start: NaiveDate,
        /// Number of shifts instantiated.
        shift_count: usize,
    },
    /// A shift was left with open slots.
    #[serde(rename = "shift.understaffed")]
    ShiftUnderstaffed {
        /// The affected shift.
        shift_id: String,
        /// The role with open slots.
        role: Role,
        /// How many slots remain open.
        missing: u32,
    },
    /// A shift started.
    #[serde(rename = "shift.started")]
    ShiftStarted {
        /// The shift.
        shift_id: String,
    },
    /// A shift finished.
    #[serde(rename = "shift.completed")]
    ShiftCompleted {
        /// The shift.
        shift_id: String,
        /// Productivity scaled by staffing.
        efficiency: f64,
    },
    /// A shift was cancelled.
    #[serde(rename = "shift.cancelled")]
    ShiftCancelled {
        /// The shift.
        shift_id: String,
        /// Employees whose hours were released.
        released_employees: Vec<String>,
    },
    /// A performance review was recorded.
    #[serde(rename = "review.conducted")]
    ReviewConducted {
        /// The reviewed employee.
        employee_id: String,
        /// Overall score.
        overall: f64,
        /// Resulting bucket.
        rating: RatingBucket,
    },
    /// An employee was enrolled in training.
    #[serde(rename = "training.assigned")]
    TrainingAssigned {
        /// The training record.
        training_id: String,
        /// The enrolled employee.
        employee_id: String,
        /// The program.
        program_id: String,
    },
    /// An employee completed training.
    #[serde(rename = "training.completed")]
    TrainingCompleted {
        /// The training record.
        training_id: String,
        /// The employee.
        employee_id: String,
        /// Final score.
        score: f64,
    },
}
