//! Weekly schedule model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Role, Shift};

/// Publication status of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Still being edited.
    Draft,
    /// Released to staff.
    Published,
    /// At least one shift has started.
    Active,
    /// Every shift is completed or cancelled.
    Completed,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleStatus::Draft => f.write_str("draft"),
            ScheduleStatus::Published => f.write_str("published"),
            ScheduleStatus::Active => f.write_str("active"),
            ScheduleStatus::Completed => f.write_str("completed"),
        }
    }
}

/// Something about a shift that needs operator attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaffingFlag {
    /// A role quota could not be filled.
    Understaffed {
        /// The affected shift.
        shift_id: String,
        /// The role with open slots.
        role: Role,
        /// How many slots remain open.
        missing: u32,
    },
    /// Total headcount is under the shift's minimum.
    BelowMinimum {
        /// The affected shift.
        shift_id: String,
        /// Headcount actually assigned.
        assigned: u32,
        /// Minimum headcount required.
        minimum: u32,
    },
}

impl StaffingFlag {
    /// The shift the flag refers to.
    pub fn shift_id(&self) -> &str {
        match self {
            StaffingFlag::Understaffed { shift_id, .. }
            | StaffingFlag::BelowMinimum { shift_id, .. } => shift_id,
        }
    }
}

/// Options recognised by weekly schedule creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Fill shifts immediately after instantiating them.
    pub auto_assign: bool,
    /// Reward candidates whose stated availability covers the shift.
    pub consider_preferences: bool,
    /// Prefer cheaper templates when they overlap. Accepted but has no effect.
    pub optimize_for_costs: bool,
    /// Flag shifts that end up under their minimum headcount.
    pub minimum_staffing: bool,
}

/// One week of shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique identifier for the schedule.
    pub id: String,
    /// First day of the week (a Monday).
    pub week_start: NaiveDate,
    /// Last day of the week (a Sunday).
    pub week_end: NaiveDate,
    /// Shifts in chronological order.
    pub shifts: Vec<Shift>,
    /// Publication status.
    pub status: ScheduleStatus,
    /// Options the schedule was built with; reused when shifts are added.
    #[serde(default)]
    pub options: ScheduleOptions,
    /// Assigned paid hours across all live assignments.
    pub total_hours: Decimal,
    /// Estimated labour cost of all live assignments.
    pub total_cost: Decimal,
    /// Staffing problems found while building or editing.
    #[serde(default)]
    pub flags: Vec<StaffingFlag>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Looks up a shift by id.
    pub fn shift(&self, shift_id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == shift_id)
    }

    /// Looks up a shift by id for modification.
    pub fn shift_mut(&mut self, shift_id: &str) -> Option<&mut Shift> {
        self.shifts.iter_mut().find(|s| s.id == shift_id)
    }

    /// Returns true if the date falls within this schedule's week.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date <= self.week_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_to_false() {
        let options: ScheduleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ScheduleOptions::default());
        assert!(!options.auto_assign);
    }

    #[test]
    fn test_flag_serialization_is_tagged() {
        let flag = StaffingFlag::Understaffed {
            shift_id: "shift_1".to_string(),
            role: Role::Cashier,
            missing: 2,
        };
        let value = serde_json::to_value(&flag).unwrap();
        assert_eq!(value["type"], "understaffed");
        assert_eq!(value["role"], "cashier");
        assert_eq!(flag.shift_id(), "shift_1");
    }

    #[test]
    fn test_covers_is_inclusive() {
        let schedule = Schedule {
            id: "sched_1".to_string(),
            week_start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            shifts: vec![],
            status: ScheduleStatus::Draft,
            options: ScheduleOptions::default(),
            total_hours: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            flags: vec![],
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        assert!(schedule.covers(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()));
        assert!(schedule.covers(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()));
        assert!(!schedule.covers(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()));
    }
}
