//! Shift template model.
//!
//! A template is the reusable archetype a dated [`Shift`](super::Shift) is
//! instantiated from.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Role;

/// Relative importance of a shift. Higher-priority shifts are staffed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Filled last.
    Low,
    /// Default priority.
    Medium,
    /// Filled first.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("low"),
            Priority::Medium => f.write_str("medium"),
            Priority::High => f.write_str("high"),
        }
    }
}

/// Which calendar days a template is used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    /// Monday to Friday.
    Weekday,
    /// Monday to Friday, only when the store runs around the clock.
    Overnight,
    /// Saturday and Sunday.
    Weekend,
}

/// A reusable shift definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    /// Unique identifier for the template.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Which days the template applies to.
    pub category: TemplateCategory,
    /// Local start time.
    pub start_time: NaiveTime,
    /// Local end time. Earlier than `start_time` for overnight templates.
    pub end_time: NaiveTime,
    /// Paid hours for the shift.
    pub duration_hours: Decimal,
    /// Break checkpoints within the shift.
    #[serde(default)]
    pub breaks: Vec<NaiveTime>,
    /// Headcount quota per role.
    pub positions: BTreeMap<Role, u32>,
    /// Staffing priority.
    pub priority: Priority,
    /// Pay premium for night or weekend work, e.g. 1.25.
    #[serde(default)]
    pub bonus_multiplier: Option<Decimal>,
}

impl ShiftTemplate {
    /// Returns true if the template finishes on the following calendar day.
    pub fn crosses_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Total headcount across all roles.
    pub fn total_positions(&self) -> u32 {
        self.positions.values().sum()
    }

    /// Returns the pay multiplier, defaulting to 1 when none is set.
    pub fn pay_multiplier(&self) -> Decimal {
        self.bonus_multiplier.unwrap_or(Decimal::ONE)
    }
}
