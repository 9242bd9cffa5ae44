//! Error types for the scheduling engine.
//!
//! Only programmer and input errors live here. Expected business outcomes
//! such as understaffed shifts or an empty roster are reported through flags,
//! events and `Option` results instead.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ScheduleStatus, ShiftAction, ShiftStatus};

/// The main error type for the scheduling engine.
///
/// # Example
///
/// ```
/// use shift_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// assert_eq!(error.kind(), "EMPLOYEE_NOT_FOUND");
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

    /// No employee with this id exists in the roster.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: String,
    },

    /// No shift template with this id exists in the catalog.
    #[error("Shift template not found: {template_id}")]
    TemplateNotFound {
        /// The id that was looked up.
        template_id: String,
    },

    /// A shift template failed validation.
    #[error("Invalid shift template '{template_id}': {message}")]
    InvalidTemplate {
        /// The id of the rejected template.
        template_id: String,
        /// What was wrong with it.
        message: String,
    },

    /// No training program with this id exists.
    #[error("Training program not found: {program_id}")]
    TrainingProgramNotFound {
        /// The id that was looked up.
        program_id: String,
    },

    /// No training record with this id exists.
    #[error("Training record not found: {training_id}")]
    TrainingNotFound {
        /// The id that was looked up.
        training_id: String,
    },

    /// The training record was already completed.
    #[error("Training '{training_id}' was already completed")]
    TrainingAlreadyCompleted {
        /// The id of the training record.
        training_id: String,
    },

    /// No shift with this id exists in any schedule.
    #[error("Shift not found: {shift_id}")]
    ShiftNotFound {
        /// The id that was looked up.
        shift_id: String,
    },

    /// No schedule with this id exists.
    #[error("Schedule not found: {schedule_id}")]
    ScheduleNotFound {
        /// The id that was looked up.
        schedule_id: String,
    },

    /// A shift lifecycle transition was not allowed from its current status.
    #[error("Cannot {action} shift '{shift_id}' while it is {status}")]
    InvalidTransition {
        /// The shift the transition was attempted on.
        shift_id: String,
        /// The status the shift was in.
        status: ShiftStatus,
        /// The rejected action.
        action: ShiftAction,
    },

    /// Only draft schedules can be published.
    #[error("Schedule '{schedule_id}' cannot be published while it is {status}")]
    ScheduleNotDraft {
        /// The schedule.
        schedule_id: String,
        /// Its current status.
        status: ScheduleStatus,
    },

    /// A manual assignment or unassignment was refused.
    #[error("Cannot change assignment of '{employee_id}' on shift '{shift_id}': {reason}")]
    AssignmentRejected {
        /// The shift.
        shift_id: String,
        /// The employee.
        employee_id: String,
        /// Why it was refused.
        reason: String,
    },

    /// A schedule could not be created for the given week.
    #[error("Invalid week starting {week_start}: {message}")]
    InvalidWeek {
        /// The requested week start.
        week_start: NaiveDate,
        /// Why it was rejected.
        message: String,
    },

    /// An argument was outside its accepted range or otherwise inconsistent.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        /// The offending argument.
        field: String,
        /// A description of the problem.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable, machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            EngineError::TemplateNotFound { .. } => "TEMPLATE_NOT_FOUND",
            EngineError::InvalidTemplate { .. } => "INVALID_TEMPLATE",
            EngineError::TrainingProgramNotFound { .. } => "TRAINING_PROGRAM_NOT_FOUND",
            EngineError::TrainingNotFound { .. } => "TRAINING_NOT_FOUND",
            EngineError::TrainingAlreadyCompleted { .. } => "TRAINING_ALREADY_COMPLETED",
            EngineError::ShiftNotFound { .. } => "SHIFT_NOT_FOUND",
            EngineError::ScheduleNotFound { .. } => "SCHEDULE_NOT_FOUND",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::ScheduleNotDraft { .. } => "SCHEDULE_NOT_DRAFT",
            EngineError::AssignmentRejected { .. } => "ASSIGNMENT_REJECTED",
            EngineError::InvalidWeek { .. } => "INVALID_WEEK",
            EngineError::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }

    /// Shorthand for an [`EngineError::InvalidArgument`].
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
        assert_eq!(error.kind(), "CONFIG_NOT_FOUND");
    }

    #[test]
    fn test_template_not_found_displays_id() {
        let error = EngineError::TemplateNotFound {
            template_id: "brunch".to_string(),
        };
        assert_eq!(error.to_string(), "Shift template not found: brunch");
        assert_eq!(error.kind(), "TEMPLATE_NOT_FOUND");
    }

    #[test]
    fn test_invalid_transition_displays_status_and_action() {
        let error = EngineError::InvalidTransition {
            shift_id: "shift_001".to_string(),
            status: ShiftStatus::Completed,
            action: ShiftAction::Start,
        };
        assert_eq!(
            error.to_string(),
            "Cannot start shift 'shift_001' while it is completed"
        );
        assert_eq!(error.kind(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_schedule_not_draft_displays_status() {
        let error = EngineError::ScheduleNotDraft {
            schedule_id: "sched_000001".to_string(),
            status: ScheduleStatus::Published,
        };
        assert_eq!(
            error.to_string(),
            "Schedule 'sched_000001' cannot be published while it is published"
        );
        assert_eq!(error.kind(), "SCHEDULE_NOT_DRAFT");
    }

    #[test]
    fn test_training_already_completed_displays_id() {
        let error = EngineError::TrainingAlreadyCompleted {
            training_id: "trn_1".to_string(),
        };
        assert_eq!(error.to_string(), "Training 'trn_1' was already completed");
    }

    #[test]
    fn test_invalid_argument_helper() {
        let error = EngineError::invalid_argument("score", "must be between 0 and 100");
        assert_eq!(
            error.to_string(),
            "Invalid argument 'score': must be between 0 and 100"
        );
        assert_eq!(error.kind(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_shift() -> EngineResult<()> {
            Err(EngineError::ShiftNotFound {
                shift_id: "shift_x".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_shift()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
