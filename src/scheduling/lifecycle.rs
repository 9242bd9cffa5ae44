//! Shift lifecycle state machine.
//!
//! ```text
//! scheduled --start--> active --complete--> completed
//!     |                  |
//!     +-----cancel-------+-----cancel-----> cancelled
//! ```
//!
//! Completed and cancelled are terminal. Any other transition is rejected
//! with [`EngineError::InvalidTransition`] and leaves the shift untouched.

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssignmentStatus, Employee, Shift, ShiftAction, ShiftPerformance, ShiftStatus,
};

use super::ledger::HoursLedger;

/// The status an action leads to, or `None` if the action is not allowed.
///
/// # Examples
///
/// ```
/// use shift_engine::models::{ShiftAction, ShiftStatus};
/// use shift_engine::scheduling::next_status;
///
/// assert_eq!(next_status(ShiftStatus::Scheduled, ShiftAction::Start), Some(ShiftStatus::Active));
/// assert_eq!(next_status(ShiftStatus::Completed, ShiftAction::Start), None);
/// assert_eq!(next_status(ShiftStatus::Scheduled, ShiftAction::Complete), None);
/// ```
pub fn next_status(current: ShiftStatus, action: ShiftAction) -> Option<ShiftStatus> {
    match (current, action) {
        (ShiftStatus::Scheduled, ShiftAction::Start) => Some(ShiftStatus::Active),
        (ShiftStatus::Active, ShiftAction::Complete) => Some(ShiftStatus::Completed),
        (ShiftStatus::Scheduled | ShiftStatus::Active, ShiftAction::Cancel) => {
            Some(ShiftStatus::Cancelled)
        }
        _ => None,
    }
}

fn transition(shift: &mut Shift, action: ShiftAction) -> EngineResult<ShiftStatus> {
    let next = next_status(shift.status, action).ok_or_else(|| EngineError::InvalidTransition {
        shift_id: shift.id.clone(),
        status: shift.status,
        action,
    })?;
    info!(
        shift_id = %shift.id,
        from = %shift.status,
        to = %next,
        "Shift transition"
    );
    shift.status = next;
    Ok(next)
}

fn set_live_assignments(shift: &mut Shift, status: AssignmentStatus) {
    for assignment in shift
        .assignments
        .iter_mut()
        .filter(|a| a.status != AssignmentStatus::Cancelled)
    {
        assignment.status = status;
    }
}

/// Moves a scheduled shift to active.
pub fn start_shift(shift: &mut Shift) -> EngineResult<()> {
    transition(shift, ShiftAction::Start)?;
    set_live_assignments(shift, AssignmentStatus::Working);
    Ok(())
}

/// Moves an active shift to completed and records the crew's realized
/// performance.
pub fn complete_shift(shift: &mut Shift, roster: &[Employee]) -> EngineResult<ShiftPerformance> {
    transition(shift, ShiftAction::Complete)?;
    set_live_assignments(shift, AssignmentStatus::Completed);
    let performance = realized_performance(shift, roster);
    shift.performance = Some(performance.clone());
    Ok(performance)
}

/// Cancels a scheduled or active shift, releasing every assigned employee's
/// hours from the ledger. Returns the ids of the released employees.
pub fn cancel_shift(shift: &mut Shift, ledger: &mut HoursLedger) -> EngineResult<Vec<String>> {
    transition(shift, ShiftAction::Cancel)?;

    let mut released = Vec::new();
    for assignment in shift
        .assignments
        .iter_mut()
        .filter(|a| a.status != AssignmentStatus::Cancelled)
    {
        assignment.status = AssignmentStatus::Cancelled;
        if ledger.release(&assignment.employee_id, &shift.id).is_some() {
            released.push(assignment.employee_id.clone());
        }
    }
    Ok(released)
}

/// Summarises how the crew of a shift performed.
///
/// Uses the current performance records of the employees assigned to the
/// shift. Employees no longer on the roster are ignored.
pub fn realized_performance(shift: &Shift, roster: &[Employee]) -> ShiftPerformance {
    let crew: Vec<&Employee> = shift
        .assignments
        .iter()
        .filter(|a| a.status != AssignmentStatus::Cancelled)
        .filter_map(|a| roster.iter().find(|e| e.id == a.employee_id))
        .collect();

    let max_staff = shift.requirements.max_staff;
    let staffing_ratio = if max_staff == 0 {
        1.0
    } else {
        (shift.headcount() as f64 / max_staff as f64).min(1.0)
    };

    let mean = |f: fn(&Employee) -> f64| {
        if crew.is_empty() {
            0.0
        } else {
            crew.iter().map(|e| f(e)).sum::<f64>() / crew.len() as f64
        }
    };
    let average_productivity = mean(|e: &Employee| e.performance.productivity);
    let customer_satisfaction = mean(|e: &Employee| e.performance.customer_satisfaction);

    ShiftPerformance {
        staffing_ratio,
        average_productivity,
        customer_satisfaction,
        efficiency: average_productivity * staffing_ratio,
    }
}
