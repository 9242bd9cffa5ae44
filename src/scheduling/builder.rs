//! Weekly schedule construction.
//!
//! Picks templates per calendar day, instantiates the week's shifts and,
//! when asked, fills them in descending priority order through the
//! eligibility, ranking and greedy assignment stages. The same hours ledger
//! is threaded through every shift so one pass can never over-commit anyone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::models::{
    Employee, Schedule, ScheduleOptions, ScheduleStatus, Shift, ShiftStatus, ShiftTemplate,
    StaffingFlag, TemplateCategory,
};

use super::assigner::{AssignmentOutcome, assign};
use super::catalog::{ShiftTemplateCatalog, instantiate};
use super::eligibility::eligible_candidates;
use super::ids::IdSequence;
use super::ledger::HoursLedger;
use super::ranking::rank;

/// The Monday on or before a date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use shift_engine::scheduling::week_start_of;
///
/// let thursday = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
/// assert_eq!(week_start_of(thursday), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
/// ```
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Templates to run on a date.
///
/// Weekdays get every weekday template, plus the overnight templates when
/// the business runs around the clock. Weekends get the first weekend
/// template only.
pub fn templates_for_day(
    catalog: &ShiftTemplateCatalog,
    date: NaiveDate,
    twenty_four_hour_operation: bool,
) -> Vec<&ShiftTemplate> {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => catalog
            .templates_for(TemplateCategory::Weekend)
            .take(1)
            .collect(),
        _ => {
            let mut selected: Vec<&ShiftTemplate> =
                catalog.templates_for(TemplateCategory::Weekday).collect();
            if twenty_four_hour_operation {
                selected.extend(catalog.templates_for(TemplateCategory::Overnight));
            }
            selected
        }
    }
}

/// Finds, ranks and assigns candidates for one shift.
pub fn fill_shift<R: Rng>(
    shift: &mut Shift,
    roster: &[Employee],
    ledger: &mut HoursLedger,
    config: &EngineConfig,
    consider_preferences: bool,
    rng: &mut R,
) -> AssignmentOutcome {
    let candidates = eligible_candidates(roster, shift, ledger, config);
    let ranked = rank(
        &candidates,
        shift,
        consider_preferences,
        &config.ranking,
        rng,
    );
    let outcome = assign(shift, &ranked, ledger, config);
    if outcome.is_understaffed() {
        warn!(
            shift_id = %shift.id,
            date = %shift.date,
            template_id = %shift.template_id,
            candidates = candidates.len(),
            "Shift left understaffed"
        );
    }
    outcome
}

/// Staffing flags for a shift. Cancelled shifts are never flagged.
pub fn staffing_flags(shift: &Shift, minimum_staffing: bool) -> Vec<StaffingFlag> {
    if shift.status == ShiftStatus::Cancelled {
        return Vec::new();
    }
    let mut flags: Vec<StaffingFlag> = shift
        .open_positions()
        .into_iter()
        .map(|(role, missing)| StaffingFlag::Understaffed {
            shift_id: shift.id.clone(),
            role,
            missing,
        })
        .collect();
    if minimum_staffing && shift.headcount() < shift.requirements.min_staff {
        flags.push(StaffingFlag::BelowMinimum {
            shift_id: shift.id.clone(),
            assigned: shift.headcount(),
            minimum: shift.requirements.min_staff,
        });
    }
    flags
}

/// Estimated labour cost of a shift's live assignments.
///
/// Hours times hourly rate times the shift's pay multiplier. Employees no
/// longer on the roster cost nothing.
pub fn shift_cost(shift: &Shift, roster: &[Employee]) -> Decimal {
    let multiplier = shift.bonus_multiplier.unwrap_or(Decimal::ONE);
    shift
        .live_assignments()
        .filter_map(|a| roster.iter().find(|e| e.id == a.employee_id))
        .map(|e| shift.duration_hours * e.hourly_rate * multiplier)
        .sum()
}

/// Recomputes a schedule's flags from its shifts.
pub fn refresh_flags(schedule: &mut Schedule) {
    let minimum_staffing = schedule.options.minimum_staffing;
    schedule.flags = schedule
        .shifts
        .iter()
        .flat_map(|s| staffing_flags(s, minimum_staffing))
        .collect();
}

/// Recomputes a schedule's hour and cost totals from its shifts.
pub fn refresh_totals(schedule: &mut Schedule, roster: &[Employee]) {
    schedule.total_hours = schedule.shifts.iter().map(Shift::assigned_hours).sum();
    schedule.total_cost = schedule
        .shifts
        .iter()
        .map(|s| shift_cost(s, roster))
        .sum::<Decimal>()
        .round_dp(2);
}

/// Moves a schedule to active once a shift has started, and to completed
/// once every shift has finished or been cancelled.
pub fn refresh_status(schedule: &mut Schedule) {
    if schedule.status == ScheduleStatus::Completed {
        return;
    }
    let all_terminal =
        !schedule.shifts.is_empty() && schedule.shifts.iter().all(|s| s.status.is_terminal());
    let any_started = schedule
        .shifts
        .iter()
        .any(|s| matches!(s.status, ShiftStatus::Active | ShiftStatus::Completed));

    if all_terminal {
        schedule.status = ScheduleStatus::Completed;
    } else if any_started {
        schedule.status = ScheduleStatus::Active;
    }
}

/// Builds weekly schedules from a catalog and a roster snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleBuilder<'a> {
    catalog: &'a ShiftTemplateCatalog,
    config: &'a EngineConfig,
    roster: &'a [Employee],
}

impl<'a> ScheduleBuilder<'a> {
    /// Creates a builder.
    pub fn new(
        catalog: &'a ShiftTemplateCatalog,
        config: &'a EngineConfig,
        roster: &'a [Employee],
    ) -> Self {
        Self {
            catalog,
            config,
            roster,
        }
    }

    /// Instantiates every shift of the week starting on `week_start`, in
    /// chronological order.
    pub fn instantiate_week(&self, week_start: NaiveDate, shift_ids: &mut IdSequence) -> Vec<Shift> {
        let mut planned: Vec<(NaiveDate, &ShiftTemplate)> = (0..7)
            .map(|offset| week_start + Duration::days(offset))
            .flat_map(|date| {
                templates_for_day(self.catalog, date, self.config.twenty_four_hour_operation)
                    .into_iter()
                    .map(move |template| (date, template))
            })
            .collect();
        planned.sort_by_key(|(date, template)| date.and_time(template.start_time));

        planned
            .into_iter()
            .map(|(date, template)| instantiate(template, date, shift_ids.next_id()))
            .collect()
    }

    /// Builds the schedule for the week containing `week_start`.
    ///
    /// Returns `None` when nobody on the roster can be scheduled. Nothing is
    /// committed to the ledger in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn build<R: Rng>(
        &self,
        schedule_ids: &mut IdSequence,
        week_start: NaiveDate,
        options: &ScheduleOptions,
        ledger: &mut HoursLedger,
        shift_ids: &mut IdSequence,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Option<Schedule> {
        let week_start = week_start_of(week_start);

        if !self.roster.iter().any(|e| e.status.is_schedulable()) {
            warn!(
                week_start = %week_start,
                roster_size = self.roster.len(),
                "No assignable employees; schedule not created"
            );
            return None;
        }
        if options.optimize_for_costs {
            debug!(week_start = %week_start, "Cost optimisation requested; template selection is unchanged");
        }

        let mut shifts = self.instantiate_week(week_start, shift_ids);

        if options.auto_assign {
            let mut order: Vec<usize> = (0..shifts.len()).collect();
            order.sort_by(|a, b| shifts[*b].priority.cmp(&shifts[*a].priority));
            for index in order {
                fill_shift(
                    &mut shifts[index],
                    self.roster,
                    ledger,
                    self.config,
                    options.consider_preferences,
                    rng,
                );
            }
        }

        let mut schedule = Schedule {
            id: schedule_ids.next_id(),
            week_start,
            week_end: week_start + Duration::days(6),
            shifts,
            status: ScheduleStatus::Draft,
            options: options.clone(),
            total_hours: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            flags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        refresh_flags(&mut schedule);
        refresh_totals(&mut schedule, self.roster);

        info!(
            schedule_id = %schedule.id,
            week_start = %week_start,
            shifts = schedule.shifts.len(),
            total_hours = %schedule.total_hours,
            total_cost = %schedule.total_cost,
            flags = schedule.flags.len(),
            "Weekly schedule created"
        );
        Some(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityPeriod, EmployeeStatus, PerformanceRecord, Priority, Role};
    use crate::scheduling::ledger::WeekKey;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 27, 9, 0, 0).unwrap()
    }

    fn employee(id: &str, role: Role, rating: f64) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            role,
            status: EmployeeStatus::Active,
            availability: [
                AvailabilityPeriod::Morning,
                AvailabilityPeriod::Afternoon,
                AvailabilityPeriod::Evening,
                AvailabilityPeriod::Night,
            ]
            .into_iter()
            .collect(),
            skills: Default::default(),
            performance: PerformanceRecord {
                overall_rating: rating,
                ..Default::default()
            },
            hourly_rate: Decimal::from(20),
            experience: 3,
        }
    }

    fn auto() -> ScheduleOptions {
        ScheduleOptions {
            auto_assign: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_day_template_selection() {
        let catalog = ShiftTemplateCatalog::standard();
        let ids = |date| -> Vec<String> {
            templates_for_day(&catalog, date, false)
                .iter()
                .map(|t| t.id.clone())
                .collect()
        };
        assert_eq!(
            ids(monday()),
            vec!["weekday_morning", "weekday_afternoon", "weekday_evening"]
        );
        assert_eq!(ids(monday() + Duration::days(5)), vec!["weekend_long"]);

        let around_the_clock = templates_for_day(&catalog, monday(), true);
        assert_eq!(around_the_clock.len(), 4);
        assert_eq!(around_the_clock[3].id, "overnight");

        let saturday = templates_for_day(&catalog, monday() + Duration::days(5), true);
        let sunday = templates_for_day(&catalog, monday() + Duration::days(6), true);
        assert_eq!(saturday.len(), 1);
        assert_eq!(saturday[0].id, "weekend_long");
        assert_eq!(sunday.len(), 1);
    }

    #[test]
    fn test_around_the_clock_week_adds_weekday_overnights_only() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig {
            twenty_four_hour_operation: true,
            ..Default::default()
        };
        let builder = ScheduleBuilder::new(&catalog, &config, &[]);
        let shifts = builder.instantiate_week(monday(), &mut IdSequence::new("shift"));

        assert_eq!(shifts.len(), 22);
        let overnights: Vec<_> = shifts
            .iter()
            .filter(|s| s.template_id == "overnight")
            .map(|s| s.date.weekday())
            .collect();
        assert_eq!(
            overnights,
            vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
        );
    }

    #[test]
    fn test_instantiate_week_is_chronological() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        let builder = ScheduleBuilder::new(&catalog, &config, &[]);
        let shifts = builder.instantiate_week(monday(), &mut IdSequence::new("shift"));

        assert_eq!(shifts.len(), 17);
        assert!(shifts.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        assert_eq!(shifts[0].id, "shift_000001");
        assert_eq!(shifts[16].template_id, "weekend_long");
    }

    #[test]
    fn test_empty_roster_returns_none_and_leaves_ledger() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        let mut terminated = employee("t1", Role::Cashier, 90.0);
        terminated.status = EmployeeStatus::Terminated;
        let roster = vec![terminated];
        let mut ledger = HoursLedger::new();

        let schedule = ScheduleBuilder::new(&catalog, &config, &roster).build(
            &mut IdSequence::new("sched"),
            monday(),
            &auto(),
            &mut ledger,
            &mut IdSequence::new("shift"),
            &mut StdRng::seed_from_u64(1),
            now(),
        );
        assert!(schedule.is_none());
        assert_eq!(ledger, HoursLedger::new());
    }

    #[test]
    fn test_build_respects_cap_and_quotas() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        let roster: Vec<Employee> = (0..4)
            .map(|i| employee(&format!("c{i}"), Role::Cashier, 60.0 + i as f64))
            .chain([employee("m0", Role::Manager, 70.0)])
            .collect();
        let mut ledger = HoursLedger::new();

        let schedule = ScheduleBuilder::new(&catalog, &config, &roster)
            .build(
                &mut IdSequence::new("sched"),
                monday() + Duration::days(3),
                &auto(),
                &mut ledger,
                &mut IdSequence::new("shift"),
                &mut StdRng::seed_from_u64(42),
                now(),
            )
            .unwrap();

        assert_eq!(schedule.week_start, monday());
        assert_eq!(schedule.week_end, monday() + Duration::days(6));
        for shift in &schedule.shifts {
            for (role, quota) in &shift.positions {
                assert!(shift.assigned_count(*role) <= *quota);
            }
        }
        let week = WeekKey::of(monday());
        for employee in &roster {
            assert!(ledger.committed_hours(&employee.id, week) <= config.max_weekly_hours);
        }
        assert!(schedule.total_hours > Decimal::ZERO);
        assert!(!schedule.flags.is_empty());
    }

    #[test]
    fn test_cost_optimisation_leaves_schedule_unchanged() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        let roster: Vec<Employee> = (0..3)
            .map(|i| employee(&format!("c{i}"), Role::Cashier, 55.0 + i as f64))
            .chain([employee("m0", Role::Manager, 75.0)])
            .collect();
        let build = |options: &ScheduleOptions| {
            ScheduleBuilder::new(&catalog, &config, &roster)
                .build(
                    &mut IdSequence::new("sched"),
                    monday(),
                    options,
                    &mut HoursLedger::new(),
                    &mut IdSequence::new("shift"),
                    &mut StdRng::seed_from_u64(7),
                    now(),
                )
                .unwrap()
        };

        let plain = build(&auto());
        let optimised = build(&ScheduleOptions {
            optimize_for_costs: true,
            ..auto()
        });

        assert!(optimised.options.optimize_for_costs);
        assert_eq!(optimised.shifts, plain.shifts);
        assert_eq!(optimised.total_hours, plain.total_hours);
        assert_eq!(optimised.total_cost, plain.total_cost);
        assert_eq!(optimised.flags, plain.flags);
    }

    #[test]
    fn test_high_priority_shifts_fill_first() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        // High-priority shifts need 60 manager hours, so a lone manager is
        // capped out before any medium shift is considered.
        let roster = vec![employee("m0", Role::Manager, 80.0)];
        let mut ledger = HoursLedger::new();

        let schedule = ScheduleBuilder::new(&catalog, &config, &roster)
            .build(
                &mut IdSequence::new("sched"),
                monday(),
                &auto(),
                &mut ledger,
                &mut IdSequence::new("shift"),
                &mut StdRng::seed_from_u64(1),
                now(),
            )
            .unwrap();

        for shift in &schedule.shifts {
            if shift.priority != Priority::High {
                assert_eq!(shift.headcount(), 0, "{} should be empty", shift.id);
            }
        }
        assert_eq!(
            ledger.committed_hours("m0", WeekKey::of(monday())),
            Decimal::from(40)
        );
    }

    #[test]
    fn test_without_auto_assign_shifts_are_empty() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        let roster = vec![employee("c0", Role::Cashier, 60.0)];
        let mut ledger = HoursLedger::new();

        let schedule = ScheduleBuilder::new(&catalog, &config, &roster)
            .build(
                &mut IdSequence::new("sched"),
                monday(),
                &ScheduleOptions::default(),
                &mut ledger,
                &mut IdSequence::new("shift"),
                &mut StdRng::seed_from_u64(1),
                now(),
            )
            .unwrap();
        assert!(schedule.shifts.iter().all(|s| s.headcount() == 0));
        assert_eq!(schedule.total_hours, Decimal::ZERO);
        assert_eq!(schedule.status, ScheduleStatus::Draft);
    }

    #[test]
    fn test_minimum_staffing_adds_below_minimum_flags() {
        let catalog = ShiftTemplateCatalog::standard();
        let shift = catalog
            .instantiate_by_id("weekday_morning", monday(), "s1")
            .unwrap();
        let plain = staffing_flags(&shift, false);
        let strict = staffing_flags(&shift, true);
        assert_eq!(plain.len(), 3);
        assert_eq!(strict.len(), 4);
        assert!(matches!(
            strict.last(),
            Some(StaffingFlag::BelowMinimum {
                assigned: 0,
                minimum: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_status_follows_shifts() {
        let catalog = ShiftTemplateCatalog::standard();
        let config = EngineConfig::default();
        let builder = ScheduleBuilder::new(&catalog, &config, &[]);
        let shifts = builder.instantiate_week(monday(), &mut IdSequence::new("shift"));
        let mut schedule = Schedule {
            id: "sched_1".to_string(),
            week_start: monday(),
            week_end: monday() + Duration::days(6),
            shifts,
            status: ScheduleStatus::Published,
            options: ScheduleOptions::default(),
            total_hours: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            flags: vec![],
            created_at: now(),
            updated_at: now(),
        };

        refresh_status(&mut schedule);
        assert_eq!(schedule.status, ScheduleStatus::Published);

        schedule.shifts[0].status = ShiftStatus::Active;
        refresh_status(&mut schedule);
        assert_eq!(schedule.status, ScheduleStatus::Active);

        for shift in &mut schedule.shifts {
            shift.status = ShiftStatus::Cancelled;
        }
        refresh_status(&mut schedule);
        assert_eq!(schedule.status, ScheduleStatus::Completed);
    }
}
