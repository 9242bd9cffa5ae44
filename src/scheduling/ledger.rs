//! Weekly-hours ledger.
//!
//! Tracks, per employee, every shift they are committed to and the hours it
//! charges against its ISO week. The ledger is the single source of truth for
//! the weekly hour cap.

use std::collections::BTreeMap;

use chrono::{Datelike, IsoWeek, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Shift;

/// An ISO year and week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    /// ISO week-numbering year.
    pub year: i32,
    /// ISO week number (1-53).
    pub week: u32,
}

impl WeekKey {
    /// The ISO week containing a date.
    pub fn of(date: NaiveDate) -> Self {
        date.iso_week().into()
    }
}

impl From<IsoWeek> for WeekKey {
    fn from(week: IsoWeek) -> Self {
        Self {
            year: week.year(),
            week: week.week(),
        }
    }
}

/// Hours an employee is committed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    /// The shift (or external source) the hours come from.
    pub source_id: String,
    /// The week the hours are charged to.
    pub week: WeekKey,
    /// Committed hours.
    pub hours: Decimal,
    /// Working window, if the commitment is a concrete shift.
    pub window: Option<(NaiveDateTime, NaiveDateTime)>,
}

/// Running per-employee, per-week hour commitments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoursLedger {
    commitments: BTreeMap<String, Vec<Commitment>>,
}

impl HoursLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total hours committed by an employee in a week.
    pub fn committed_hours(&self, employee_id: &str, week: WeekKey) -> Decimal {
        self.commitments
            .get(employee_id)
            .map(|list| {
                list.iter()
                    .filter(|c| c.week == week)
                    .map(|c| c.hours)
                    .sum::<Decimal>()
            })
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if adding `hours` in `week` stays within `cap`.
    pub fn fits(&self, employee_id: &str, week: WeekKey, hours: Decimal, cap: Decimal) -> bool {
        self.committed_hours(employee_id, week) + hours <= cap
    }

    /// Returns true if the employee already works during any part of the window.
    pub fn overlaps(&self, employee_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.commitments.get(employee_id).is_some_and(|list| {
            list.iter().any(|c| match c.window {
                Some((s, e)) => s < end && start < e,
                None => false,
            })
        })
    }

    /// Returns true if the employee is committed to this source.
    pub fn is_committed(&self, employee_id: &str, source_id: &str) -> bool {
        self.commitments
            .get(employee_id)
            .is_some_and(|list| list.iter().any(|c| c.source_id == source_id))
    }

    /// Commits an employee to a shift. Returns false if already committed.
    pub fn commit_shift(&mut self, employee_id: &str, shift: &Shift) -> bool {
        if self.is_committed(employee_id, &shift.id) {
            return false;
        }
        self.commitments
            .entry(employee_id.to_string())
            .or_default()
            .push(Commitment {
                source_id: shift.id.clone(),
                week: shift.iso_week().into(),
                hours: shift.duration_hours,
                window: Some((shift.start_time, shift.end_time)),
            });
        true
    }

    /// Records hours that do not come from a shift in this engine, such as
    /// hours already worked before the engine took over. Returns false if the
    /// source was already recorded.
    pub fn commit_external(
        &mut self,
        employee_id: &str,
        source_id: &str,
        week: WeekKey,
        hours: Decimal,
    ) -> bool {
        if self.is_committed(employee_id, source_id) {
            return false;
        }
        self.commitments
            .entry(employee_id.to_string())
            .or_default()
            .push(Commitment {
                source_id: source_id.to_string(),
                week,
                hours,
                window: None,
            });
        true
    }

    /// Releases one commitment, returning the hours freed.
    pub fn release(&mut self, employee_id: &str, source_id: &str) -> Option<Decimal> {
        let list = self.commitments.get_mut(employee_id)?;
        let index = list.iter().position(|c| c.source_id == source_id)?;
        let released = list.remove(index);
        if list.is_empty() {
            self.commitments.remove(employee_id);
        }
        Some(released.hours)
    }

    /// Every commitment for an employee.
    pub fn commitments(&self, employee_id: &str) -> &[Commitment] {
        self.commitments
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
