//! Greedy role assignment.
//!
//! Walks a ranked candidate list once, top to bottom, filling role quotas and
//! charging each assignment to the hours ledger before the next candidate is
//! considered. This is a single-pass heuristic with no backtracking, so a
//! week built shift by shift is not guaranteed to be globally optimal.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{Assignment, AssignmentStatus, Role, Shift};

use super::ledger::{HoursLedger, WeekKey};
use super::ranking::RankedCandidate;

/// What a single assignment pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentOutcome {
    /// Assignments created in this pass, in creation order.
    pub assignments: Vec<Assignment>,
    /// Roles still open afterwards and how many slots each is missing.
    pub unfilled: BTreeMap<Role, u32>,
}

impl AssignmentOutcome {
    /// Returns true if the shift was left with open slots.
    pub fn is_understaffed(&self) -> bool {
        !self.unfilled.is_empty()
    }
}

/// The role a candidate would take on this shift, if any.
///
/// Their own role when it has an open slot. Failing that, only the override
/// role may step into the highest-priority open role.
pub fn best_fit_role(role: Role, shift: &Shift, override_role: Role) -> Option<Role> {
    if shift.open_slots(role) > 0 {
        return Some(role);
    }
    if role == override_role {
        return shift.open_positions().keys().next().copied();
    }
    None
}

/// Fills open slots on a shift from a ranked candidate list.
///
/// Each accepted candidate is committed to the ledger immediately so later
/// shifts in the same pass see the updated hours. Candidates who would break
/// the weekly cap or who already work an overlapping shift are skipped.
/// Stops as soon as every quota is met.
pub fn assign(
    shift: &mut Shift,
    ranked: &[RankedCandidate],
    ledger: &mut HoursLedger,
    config: &EngineConfig,
) -> AssignmentOutcome {
    let mut outcome = AssignmentOutcome::default();
    let week = WeekKey::from(shift.iso_week());

    for candidate in ranked {
        if !shift.is_understaffed() {
            break;
        }
        if shift.has_employee(&candidate.employee_id) {
            continue;
        }
        if !ledger.fits(
            &candidate.employee_id,
            week,
            shift.duration_hours,
            config.max_weekly_hours,
        ) || ledger.overlaps(&candidate.employee_id, shift.start_time, shift.end_time)
        {
            continue;
        }
        let Some(role) = best_fit_role(candidate.role, shift, config.override_role) else {
            continue;
        };

        let assignment = Assignment {
            employee_id: candidate.employee_id.clone(),
            role,
            shift_id: shift.id.clone(),
            start_time: shift.start_time,
            end_time: shift.end_time,
            status: AssignmentStatus::Scheduled,
        };
        ledger.commit_shift(&candidate.employee_id, shift);
        shift.assignments.push(assignment.clone());
        debug!(
            shift_id = %shift.id,
            employee_id = %candidate.employee_id,
            role = %role,
            score = candidate.score,
            "Assigned employee to shift"
        );
        outcome.assignments.push(assignment);
    }

    outcome.unfilled = shift.open_positions();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::ShiftTemplateCatalog;
    use crate::scheduling::ranking::ScoreBreakdown;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn shift(template: &str, id: &str) -> Shift {
        ShiftTemplateCatalog::standard()
            .instantiate_by_id(template, monday(), id)
            .unwrap()
    }

    fn candidate(id: &str, role: Role, score: f64) -> RankedCandidate {
        RankedCandidate {
            employee_id: id.to_string(),
            role,
            score,
            breakdown: ScoreBreakdown::default(),
        }
    }

    #[test]
    fn test_fills_quota_in_rank_order() {
        let mut afternoon = shift("weekday_afternoon", "s1");
        let mut ledger = HoursLedger::new();
        let ranked = vec![
            candidate("c1", Role::Cashier, 90.0),
            candidate("c2", Role::Cashier, 80.0),
            candidate("c3", Role::Cashier, 70.0),
        ];

        let outcome = assign(&mut afternoon, &ranked, &mut ledger, &EngineConfig::default());

        let ids: Vec<&str> = outcome.assignments.iter().map(|a| a.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert_eq!(afternoon.assigned_count(Role::Cashier), 2);
        assert_eq!(outcome.unfilled.get(&Role::CustomerService), Some(&1));
        assert!(outcome.is_understaffed());
    }

    #[test]
    fn test_commits_hours_to_ledger() {
        let mut afternoon = shift("weekday_afternoon", "s1");
        let mut ledger = HoursLedger::new();
        assign(
            &mut afternoon,
            &[candidate("c1", Role::Cashier, 90.0)],
            &mut ledger,
            &EngineConfig::default(),
        );
        assert_eq!(
            ledger.committed_hours("c1", WeekKey::of(monday())),
            Decimal::from(6)
        );
    }

    #[test]
    fn test_override_role_takes_highest_priority_open_slot() {
        let mut afternoon = shift("weekday_afternoon", "s1");
        let mut ledger = HoursLedger::new();
        let outcome = assign(
            &mut afternoon,
            &[candidate("m1", Role::Manager, 99.0)],
            &mut ledger,
            &EngineConfig::default(),
        );
        assert_eq!(outcome.assignments[0].role, Role::Cashier);
    }

    #[test]
    fn test_non_override_role_without_slot_is_skipped() {
        let mut afternoon = shift("weekday_afternoon", "s1");
        let mut ledger = HoursLedger::new();
        let outcome = assign(
            &mut afternoon,
            &[candidate("g1", Role::Security, 99.0)],
            &mut ledger,
            &EngineConfig::default(),
        );
        assert!(outcome.assignments.is_empty());
        assert_eq!(ledger.committed_hours("g1", WeekKey::of(monday())), Decimal::ZERO);
    }

    #[test]
    fn test_skips_candidates_over_cap_or_double_booked() {
        let config = EngineConfig::default();
        let mut ledger = HoursLedger::new();
        ledger.commit_external("c1", "prior", WeekKey::of(monday()), Decimal::from(36));

        let mut morning = shift("weekday_morning", "s1");
        assign(&mut morning, &[candidate("c2", Role::Cashier, 90.0)], &mut ledger, &config);

        let mut afternoon = shift("weekday_afternoon", "s2");
        let outcome = assign(
            &mut afternoon,
            &[
                candidate("c1", Role::Cashier, 95.0),
                candidate("c2", Role::Cashier, 90.0),
                candidate("c3", Role::Cashier, 10.0),
            ],
            &mut ledger,
            &config,
        );
        let ids: Vec<&str> = outcome.assignments.iter().map(|a| a.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["c3"]);
    }

    #[test]
    fn test_stops_once_fully_staffed() {
        let mut evening = shift("weekday_evening", "s1");
        let mut ledger = HoursLedger::new();
        let outcome = assign(
            &mut evening,
            &[
                candidate("c1", Role::Cashier, 90.0),
                candidate("k1", Role::Cleaner, 80.0),
                candidate("c2", Role::Cashier, 70.0),
            ],
            &mut ledger,
            &EngineConfig::default(),
        );
        assert_eq!(outcome.assignments.len(), 2);
        assert!(!outcome.is_understaffed());
        assert!(ledger.commitments("c2").is_empty());
    }
}
