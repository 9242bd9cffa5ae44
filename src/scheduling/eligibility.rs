//! Eligibility predicates.
//!
//! Pure checks deciding whether an employee may be considered for a shift.
//! Failing a check silently removes the employee from ranking; it is never an
//! error.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::models::{Employee, Role, Shift};

use super::ledger::{HoursLedger, WeekKey};

/// Returns true if the employee can work the shift at all.
///
/// All three must hold:
/// - the employee's availability includes the period the shift starts in
/// - the shift's hours fit under the weekly cap for its ISO week
/// - the employee is on probation or active
pub fn is_available(
    employee: &Employee,
    shift: &Shift,
    ledger: &HoursLedger,
    max_weekly_hours: Decimal,
) -> bool {
    employee.status.is_schedulable()
        && employee.is_available_in(shift.period())
        && ledger.fits(
            &employee.id,
            WeekKey::from(shift.iso_week()),
            shift.duration_hours,
            max_weekly_hours,
        )
}

/// Returns true if the shift has an open slot the employee could fill.
///
/// Employees in the override role may fill any open slot.
pub fn is_compatible(employee: &Employee, shift: &Shift, override_role: Role) -> bool {
    if employee.role == override_role {
        return shift.is_understaffed();
    }
    shift.open_slots(employee.role) > 0
}

/// Roster members passing both predicates who are not already on the shift.
pub fn eligible_candidates<'a>(
    roster: &'a [Employee],
    shift: &Shift,
    ledger: &HoursLedger,
    config: &EngineConfig,
) -> Vec<&'a Employee> {
    roster
        .iter()
        .filter(|e| !shift.has_employee(&e.id))
        .filter(|e| is_available(e, shift, ledger, config.max_weekly_hours))
        .filter(|e| is_compatible(e, shift, config.override_role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityPeriod, EmployeeStatus, PerformanceRecord};
    use crate::scheduling::ShiftTemplateCatalog;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn morning_shift() -> Shift {
        ShiftTemplateCatalog::standard()
            .instantiate_by_id("weekday_morning", monday(), "shift_1")
            .unwrap()
    }

    fn employee(id: &str, role: Role, status: EmployeeStatus) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            role,
            status,
            availability: [AvailabilityPeriod::Morning].into_iter().collect(),
            skills: Default::default(),
            performance: PerformanceRecord::default(),
            hourly_rate: Decimal::from(25),
            experience: 0,
        }
    }

    #[test]
    fn test_available_when_all_conditions_hold() {
        let ledger = HoursLedger::new();
        let cashier = employee("c1", Role::Cashier, EmployeeStatus::Probation);
        assert!(is_available(&cashier, &morning_shift(), &ledger, Decimal::from(40)));
    }

    #[test]
    fn test_unavailable_outside_stated_periods() {
        let ledger = HoursLedger::new();
        let mut cashier = employee("c1", Role::Cashier, EmployeeStatus::Active);
        cashier.availability = [AvailabilityPeriod::Evening].into_iter().collect();
        assert!(!is_available(&cashier, &morning_shift(), &ledger, Decimal::from(40)));
    }

    #[test]
    fn test_unavailable_when_hours_would_exceed_cap() {
        let mut ledger = HoursLedger::new();
        ledger.commit_external("c1", "prior", WeekKey::of(monday()), Decimal::from(38));
        let cashier = employee("c1", Role::Cashier, EmployeeStatus::Active);
        assert!(!is_available(&cashier, &morning_shift(), &ledger, Decimal::from(40)));
        assert!(is_available(&cashier, &morning_shift(), &ledger, Decimal::from(46)));
    }

    #[test]
    fn test_unavailable_when_not_schedulable() {
        let ledger = HoursLedger::new();
        for status in [EmployeeStatus::Inactive, EmployeeStatus::Terminated] {
            let cashier = employee("c1", Role::Cashier, status);
            assert!(!is_available(&cashier, &morning_shift(), &ledger, Decimal::from(40)));
        }
    }

    #[test]
    fn test_compatible_only_with_open_role() {
        let shift = morning_shift();
        let cashier = employee("c1", Role::Cashier, EmployeeStatus::Active);
        let guard = employee("g1", Role::Security, EmployeeStatus::Active);
        assert!(is_compatible(&cashier, &shift, Role::Manager));
        assert!(!is_compatible(&guard, &shift, Role::Manager));
    }

    #[test]
    fn test_override_role_compatible_with_any_open_slot() {
        let mut shift = morning_shift();
        shift.positions.remove(&Role::Manager);
        let manager = employee("m1", Role::Manager, EmployeeStatus::Active);
        assert!(is_compatible(&manager, &shift, Role::Manager));

        shift.positions.clear();
        assert!(!is_compatible(&manager, &shift, Role::Manager));
    }

    #[test]
    fn test_eligible_candidates_filters_roster() {
        let roster = vec![
            employee("c1", Role::Cashier, EmployeeStatus::Active),
            employee("c2", Role::Cashier, EmployeeStatus::Terminated),
            employee("g1", Role::Security, EmployeeStatus::Active),
        ];
        let shift = morning_shift();
        let config = EngineConfig::default();
        let eligible = eligible_candidates(&roster, &shift, &HoursLedger::new(), &config);
        let ids: Vec<&str> = eligible.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c1"]);
    }
}
