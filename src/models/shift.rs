//! Shift model and related types.
//!
//! A [`Shift`] is a dated instance of a [`ShiftTemplate`](super::ShiftTemplate)
//! carrying its own copy of the role quota, its assignments and its lifecycle
//! status.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, IsoWeek, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AvailabilityPeriod, Priority, Role};

/// Lifecycle status of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Planned, not yet started.
    Scheduled,
    /// Currently running.
    Active,
    /// Finished; realized performance is recorded.
    Completed,
    /// Called off by an operator.
    Cancelled,
}

impl ShiftStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, ShiftStatus::Completed | ShiftStatus::Cancelled)
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftStatus::Scheduled => f.write_str("scheduled"),
            ShiftStatus::Active => f.write_str("active"),
            ShiftStatus::Completed => f.write_str("completed"),
            ShiftStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A lifecycle trigger applied to a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftAction {
    /// Shift-start trigger.
    Start,
    /// Shift-end trigger.
    Complete,
    /// Manual cancellation.
    Cancel,
}

impl fmt::Display for ShiftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftAction::Start => f.write_str("start"),
            ShiftAction::Complete => f.write_str("complete"),
            ShiftAction::Cancel => f.write_str("cancel"),
        }
    }
}

/// Status of a single assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Booked onto a scheduled shift.
    Scheduled,
    /// The shift is running.
    Working,
    /// The shift finished.
    Completed,
    /// The shift or the assignment was cancelled.
    Cancelled,
}

/// An employee booked into a role on a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// The assigned employee.
    pub employee_id: String,
    /// The role the employee fills on this shift.
    pub role: Role,
    /// The shift this assignment belongs to.
    pub shift_id: String,
    /// Start of the working window.
    pub start_time: NaiveDateTime,
    /// End of the working window.
    pub end_time: NaiveDateTime,
    /// Assignment status.
    pub status: AssignmentStatus,
}

/// How much prior experience a shift asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceTier {
    /// Anyone may work it.
    Any,
    /// Experienced staff are strongly preferred.
    Experienced,
}

/// Staffing requirements derived from a shift's quota and template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRequirements {
    /// Minimum headcount for the shift to run safely.
    pub min_staff: u32,
    /// Maximum headcount (the full quota).
    pub max_staff: u32,
    /// Roles the shift cannot run without.
    pub critical_roles: Vec<Role>,
    /// Skills the ranker rewards for this shift.
    pub preferred_skills: Vec<String>,
    /// Required experience tier.
    pub experience: ExperienceTier,
}

/// Performance realized by the crew of a completed shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPerformance {
    /// Assigned headcount divided by the full quota (0-1).
    pub staffing_ratio: f64,
    /// Mean productivity of the assigned employees.
    pub average_productivity: f64,
    /// Mean customer satisfaction of the assigned employees.
    pub customer_satisfaction: f64,
    /// Productivity scaled by staffing ratio.
    pub efficiency: f64,
}

/// A concrete, dated shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The template this shift was instantiated from.
    pub template_id: String,
    /// Calendar date the shift starts on.
    pub date: NaiveDate,
    /// Start of the shift.
    pub start_time: NaiveDateTime,
    /// End of the shift.
    pub end_time: NaiveDateTime,
    /// Paid hours.
    pub duration_hours: Decimal,
    /// Staffing priority copied from the template.
    pub priority: Priority,
    /// Pay premium copied from the template.
    #[serde(default)]
    pub bonus_multiplier: Option<Decimal>,
    /// Headcount quota per role, owned by this shift.
    pub positions: BTreeMap<Role, u32>,
    /// Current assignments, including cancelled ones.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Lifecycle status.
    pub status: ShiftStatus,
    /// Derived staffing requirements.
    pub requirements: ShiftRequirements,
    /// Realized performance, set on completion.
    #[serde(default)]
    pub performance: Option<ShiftPerformance>,
}

impl Shift {
    /// Assignments that still hold a slot.
    pub fn live_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.status != AssignmentStatus::Cancelled)
    }

    /// Number of live assignments in a role.
    pub fn assigned_count(&self, role: Role) -> u32 {
        self.live_assignments().filter(|a| a.role == role).count() as u32
    }

    /// Total live headcount.
    pub fn headcount(&self) -> u32 {
        self.live_assignments().count() as u32
    }

    /// Slots still open in a role.
    pub fn open_slots(&self, role: Role) -> u32 {
        let quota = self.positions.get(&role).copied().unwrap_or(0);
        quota.saturating_sub(self.assigned_count(role))
    }

    /// Roles with open slots and how many are missing, in fill-priority order.
    pub fn open_positions(&self) -> BTreeMap<Role, u32> {
        self.positions
            .keys()
            .map(|role| (*role, self.open_slots(*role)))
            .filter(|(_, open)| *open > 0)
            .collect()
    }

    /// Returns true if any role quota is unfilled.
    pub fn is_understaffed(&self) -> bool {
        !self.open_positions().is_empty()
    }

    /// Returns true if the employee holds a live assignment on this shift.
    pub fn has_employee(&self, employee_id: &str) -> bool {
        self.live_assignments().any(|a| a.employee_id == employee_id)
    }

    /// The availability period the shift starts in.
    pub fn period(&self) -> AvailabilityPeriod {
        AvailabilityPeriod::from_time(self.start_time.time())
    }

    /// The ISO week the shift's hours are charged against.
    pub fn iso_week(&self) -> IsoWeek {
        self.date.iso_week()
    }

    /// Paid hours across all live assignments.
    pub fn assigned_hours(&self) -> Decimal {
        self.duration_hours * Decimal::from(self.headcount())
    }
}
