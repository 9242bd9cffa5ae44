//! The scheduling engine facade.
//!
//! [`SchedulingEngine`] owns the hours ledger, the stored schedules, training
//! and review history, and a buffer of [`DomainEvent`]s. The roster and the
//! clock are injected, and all randomness comes from seedable generators so a
//! fixed seed reproduces every schedule exactly.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use rust_decimal::Decimal;
//! use shift_engine::engine::SchedulingEngine;
//! use shift_engine::models::{Employee, EmployeeStatus, PerformanceRecord, Role, ScheduleOptions};
//! use shift_engine::roster::InMemoryRoster;
//! use shift_engine::scheduling::ManualClock;
//!
//! let cashier = Employee {
//!     id: "emp_1".to_string(),
//!     name: "Sam".to_string(),
//!     role: Role::Cashier,
//!     status: EmployeeStatus::Active,
//!     availability: Default::default(),
//!     skills: Default::default(),
//!     performance: PerformanceRecord::default(),
//!     hourly_rate: Decimal::from(24),
//!     experience: 0,
//! };
//!
//! let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()));
//! let mut engine = SchedulingEngine::builder()
//!     .clock(clock)
//!     .seed(7)
//!     .build(InMemoryRoster::new(vec![cashier]));
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let schedule = engine.create_weekly_schedule(monday, &ScheduleOptions::default());
//! assert_eq!(schedule.map(|s| s.shifts.len()), Some(17));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ConfigLoader, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Assignment, AssignmentStatus, DomainEvent, PerformanceRecord, PerformanceReview,
    ReviewPeriod, Role, Schedule, ScheduleOptions, ScheduleStatus, Shift, ShiftPerformance,
    ShiftStatus, ShiftTemplate, StaffingFlag, TemplateCategory, TrainingProgram, TrainingRecord,
    TrainingStatus,
};
use crate::roster::RosterRepository;
use crate::scheduling::{
    Clock, HoursLedger, IdSequence, ReviewHistory, ScheduleBuilder, ScheduledTask,
    ShiftTemplateCatalog, SystemClock, TaskQueue, TeamMetrics, TrainingEffect, apply_training,
    cancel_shift, complete_shift, compute_requirements, conduct_review, fill_shift, instantiate,
    is_available, refresh_flags, refresh_status, refresh_totals, start_shift, team_metrics,
    week_start_of,
};

/// Kinds of periodic tick delivered by the time collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    /// Once per day. Ensures the current week has a schedule.
    Daily,
    /// Once per week. Ensures next week has a schedule.
    Weekly,
    /// Once per hour. Starts and completes shifts whose boundaries passed.
    Hourly,
}

impl TickKind {
    /// The start of the period a tick at `at` belongs to.
    pub fn period_start(self, at: DateTime<Utc>) -> NaiveDateTime {
        let at = at.naive_utc();
        match self {
            TickKind::Daily => at.date().and_time(NaiveTime::MIN),
            TickKind::Weekly => week_start_of(at.date()).and_time(NaiveTime::MIN),
            TickKind::Hourly => at
                .date()
                .and_time(NaiveTime::from_hms_opt(at.hour(), 0, 0).unwrap_or(NaiveTime::MIN)),
        }
    }
}

/// What handling a tick did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// The tick kind.
    pub kind: TickKind,
    /// Start of the period the tick covered.
    pub period_start: NaiveDateTime,
    /// True if this period was already handled and nothing was done.
    pub duplicate: bool,
    /// Schedules created by this tick.
    pub schedules_created: Vec<String>,
    /// Shifts started by this tick.
    pub shifts_started: Vec<String>,
    /// Shifts completed by this tick.
    pub shifts_completed: Vec<String>,
}

/// An employee's performance as seen by reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePerformance {
    /// The employee.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Primary role.
    pub role: Role,
    /// Current performance record.
    pub record: PerformanceRecord,
    /// Current skill map.
    pub skills: BTreeMap<String, f64>,
    /// Shifts completed, all time.
    pub shifts_completed: u32,
    /// Trainings completed, all time.
    pub trainings_completed: u32,
    /// The most recent review, if any.
    pub latest_review: Option<PerformanceReview>,
}

/// Configures and creates a [`SchedulingEngine`].
pub struct EngineBuilder {
    config: EngineConfig,
    catalog: ShiftTemplateCatalog,
    programs: Vec<TrainingProgram>,
    clock: Arc<dyn Clock>,
    seed: Option<u64>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            catalog: ShiftTemplateCatalog::standard(),
            programs: Vec::new(),
            clock: Arc::new(SystemClock),
            seed: None,
        }
    }
}

impl EngineBuilder {
    /// Uses settings, templates and programs from a loaded configuration.
    pub fn with_loader(mut self, loader: ConfigLoader) -> Self {
        let (config, catalog, programs) = loader.into_parts();
        self.config = config;
        self.catalog = catalog;
        self.programs = programs;
        self
    }

    /// Sets the engine settings.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the template catalog.
    pub fn catalog(mut self, catalog: ShiftTemplateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the training programs.
    pub fn programs(mut self, programs: Vec<TrainingProgram>) -> Self {
        self.programs = programs;
        self
    }

    /// Sets the clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seeds the random sources. Without a seed they draw from OS entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Creates the engine over a roster.
    pub fn build<R: RosterRepository + 'static>(self, roster: R) -> SchedulingEngine {
        let (ranking_rng, morale_rng) = match self.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
        };
        let now = self.clock.now();

        SchedulingEngine {
            config: self.config,
            catalog: self.catalog,
            programs: self.programs,
            roster: Box::new(roster),
            clock: self.clock,
            ranking_rng,
            morale_rng,
            ledger: HoursLedger::new(),
            schedules: Vec::new(),
            trainings: Vec::new(),
            reviews: Vec::new(),
            processed_ticks: BTreeSet::new(),
            tasks: TaskQueue::new(now),
            events: Vec::new(),
            schedule_ids: IdSequence::new("sched"),
            shift_ids: IdSequence::new("shift"),
            training_ids: IdSequence::new("trn"),
            review_ids: IdSequence::new("rev"),
        }
    }
}

/// Builds schedules, runs the shift lifecycle and applies performance
/// feedback over an injected roster.
pub struct SchedulingEngine {
    config: EngineConfig,
    catalog: ShiftTemplateCatalog,
    programs: Vec<TrainingProgram>,
    roster: Box<dyn RosterRepository>,
    clock: Arc<dyn Clock>,
    ranking_rng: StdRng,
    morale_rng: StdRng,
    ledger: HoursLedger,
    schedules: Vec<Schedule>,
    trainings: Vec<TrainingRecord>,
    reviews: Vec<PerformanceReview>,
    processed_ticks: BTreeSet<(TickKind, NaiveDateTime)>,
    tasks: TaskQueue,
    events: Vec<DomainEvent>,
    schedule_ids: IdSequence,
    shift_ids: IdSequence,
    training_ids: IdSequence,
    review_ids: IdSequence,
}

impl SchedulingEngine {
    /// Starts configuring an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    // ---- schedules ----

    /// Builds and stores the schedule for the week containing `week_start`.
    ///
    /// Returns `None`, storing nothing, when the roster has no probation or
    /// active employees.
    pub fn create_weekly_schedule(
        &mut self,
        week_start: NaiveDate,
        options: &ScheduleOptions,
    ) -> Option<&Schedule> {
        let now = self.clock.now();
        let schedule = ScheduleBuilder::new(&self.catalog, &self.config, self.roster.employees())
            .build(
                &mut self.schedule_ids,
                week_start,
                options,
                &mut self.ledger,
                &mut self.shift_ids,
                &mut self.ranking_rng,
                now,
            )?;

        self.events.push(DomainEvent::ScheduleCreated {
            schedule_id: schedule.id.clone(),
            week_start: schedule.week_start,
            shift_count: schedule.shifts.len(),
        });
        if options.auto_assign {
            self.push_understaffed_events(&schedule.flags);
        }
        self.schedules.push(schedule);
        self.schedules.last()
    }

    /// Releases a draft schedule to staff.
    pub fn publish_schedule(&mut self, schedule_id: &str) -> EngineResult<&Schedule> {
        let index = self.schedule_index(schedule_id)?;
        let schedule = &mut self.schedules[index];
        if schedule.status != ScheduleStatus::Draft {
            return Err(EngineError::ScheduleNotDraft {
                schedule_id: schedule_id.to_string(),
                status: schedule.status,
            });
        }
        schedule.status = ScheduleStatus::Published;
        schedule.updated_at = self.clock.now();
        info!(schedule_id = %schedule_id, "Schedule published");
        Ok(&self.schedules[index])
    }

    /// Every stored schedule, oldest first.
    pub fn get_schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// One stored schedule.
    pub fn get_schedule(&self, schedule_id: &str) -> EngineResult<&Schedule> {
        let index = self.schedule_index(schedule_id)?;
        Ok(&self.schedules[index])
    }

    /// Every shift currently running.
    pub fn get_active_shifts(&self) -> Vec<&Shift> {
        self.schedules
            .iter()
            .flat_map(|s| s.shifts.iter())
            .filter(|s| s.status == ShiftStatus::Active)
            .collect()
    }

    /// One shift from any schedule.
    pub fn get_shift(&self, shift_id: &str) -> EngineResult<&Shift> {
        let (i, j) = self.shift_position(shift_id)?;
        Ok(&self.schedules[i].shifts[j])
    }

    // ---- catalog and programs ----

    /// Templates in catalog order.
    pub fn get_shift_templates(&self) -> &[ShiftTemplate] {
        self.catalog.list_templates()
    }

    /// Adds a template to the catalog.
    pub fn add_template(&mut self, template: ShiftTemplate) -> EngineResult<()> {
        self.catalog.add_template(template)
    }

    /// Replaces a template. Existing shifts keep their own quota.
    pub fn replace_template(&mut self, template: ShiftTemplate) -> EngineResult<ShiftTemplate> {
        self.catalog.replace_template(template)
    }

    /// Removes a template from the catalog.
    pub fn remove_template(&mut self, template_id: &str) -> EngineResult<ShiftTemplate> {
        self.catalog.remove_template(template_id)
    }

    /// Training programs, as configured.
    pub fn get_training_programs(&self) -> &[TrainingProgram] {
        &self.programs
    }

    // ---- shift editing ----

    /// Adds a shift from a template to an existing schedule, optionally
    /// filling it straight away.
    pub fn add_shift(
        &mut self,
        schedule_id: &str,
        template_id: &str,
        date: NaiveDate,
        auto_assign: bool,
    ) -> EngineResult<&Shift> {
        let index = self.schedule_index(schedule_id)?;
        let schedule = &self.schedules[index];
        if !schedule.covers(date) {
            return Err(EngineError::InvalidWeek {
                week_start: schedule.week_start,
                message: format!("{date} is outside schedule '{schedule_id}'"),
            });
        }
        let template = self.catalog.get_template(template_id)?;
        let mut shift = instantiate(template, date, self.shift_ids.next_id());

        if auto_assign {
            let consider_preferences = self.schedules[index].options.consider_preferences;
            let outcome = fill_shift(
                &mut shift,
                self.roster.employees(),
                &mut self.ledger,
                &self.config,
                consider_preferences,
                &mut self.ranking_rng,
            );
            for (role, missing) in outcome.unfilled {
                self.events.push(DomainEvent::ShiftUnderstaffed {
                    shift_id: shift.id.clone(),
                    role,
                    missing,
                });
            }
        }

        let shift_id = shift.id.clone();
        let shifts = &mut self.schedules[index].shifts;
        let position = shifts
            .iter()
            .position(|s| s.start_time > shift.start_time)
            .unwrap_or(shifts.len());
        shifts.insert(position, shift);
        info!(schedule_id = %schedule_id, shift_id = %shift_id, template_id = %template_id, "Shift added");

        self.touch(index);
        Ok(&self.schedules[index].shifts[position])
    }

    /// Books an employee onto a shift by hand.
    ///
    /// The employee must pass the same availability and hour checks as the
    /// automatic pass. `role` defaults to the employee's own; only the
    /// override role may take a different one.
    pub fn assign_employee(
        &mut self,
        shift_id: &str,
        employee_id: &str,
        role: Option<Role>,
    ) -> EngineResult<Assignment> {
        let (i, j) = self.shift_position(shift_id)?;
        let employee = self.roster.get(employee_id)?;
        let shift = &self.schedules[i].shifts[j];
        let reject = |reason: &str| EngineError::AssignmentRejected {
            shift_id: shift_id.to_string(),
            employee_id: employee_id.to_string(),
            reason: reason.to_string(),
        };

        if shift.status.is_terminal() {
            return Err(reject("the shift has already finished"));
        }
        if shift.has_employee(employee_id) {
            return Err(reject("the employee is already on this shift"));
        }
        let role = role.unwrap_or(employee.role);
        if role != employee.role && employee.role != self.config.override_role {
            return Err(reject("only the override role may fill another role"));
        }
        if shift.open_slots(role) == 0 {
            return Err(reject("no open slot in that role"));
        }
        if !is_available(employee, shift, &self.ledger, self.config.max_weekly_hours) {
            return Err(reject("the employee is not available for this shift"));
        }
        if self.ledger.overlaps(employee_id, shift.start_time, shift.end_time) {
            return Err(reject("the employee works an overlapping shift"));
        }

        let assignment = Assignment {
            employee_id: employee_id.to_string(),
            role,
            shift_id: shift_id.to_string(),
            start_time: shift.start_time,
            end_time: shift.end_time,
            status: match shift.status {
                ShiftStatus::Active => AssignmentStatus::Working,
                _ => AssignmentStatus::Scheduled,
            },
        };
        self.ledger.commit_shift(employee_id, shift);
        self.schedules[i].shifts[j].assignments.push(assignment.clone());
        info!(shift_id = %shift_id, employee_id = %employee_id, role = %role, "Employee assigned manually");

        self.touch(i);
        Ok(assignment)
    }

    /// Removes an employee from a shift and releases their hours.
    pub fn unassign_employee(&mut self, shift_id: &str, employee_id: &str) -> EngineResult<()> {
        let (i, j) = self.shift_position(shift_id)?;
        let shift = &mut self.schedules[i].shifts[j];
        let reject = |reason: &str| EngineError::AssignmentRejected {
            shift_id: shift_id.to_string(),
            employee_id: employee_id.to_string(),
            reason: reason.to_string(),
        };

        if shift.status.is_terminal() {
            return Err(reject("the shift has already finished"));
        }
        let assignment = shift
            .assignments
            .iter_mut()
            .find(|a| a.employee_id == employee_id && a.status != AssignmentStatus::Cancelled)
            .ok_or_else(|| reject("the employee is not on this shift"))?;
        assignment.status = AssignmentStatus::Cancelled;
        self.ledger.release(employee_id, shift_id);
        info!(shift_id = %shift_id, employee_id = %employee_id, "Employee unassigned");

        self.touch(i);
        Ok(())
    }

    /// Changes a shift's role quota.
    ///
    /// A quota may not drop below the number already assigned in that role.
    pub fn update_positions(
        &mut self,
        shift_id: &str,
        positions: BTreeMap<Role, u32>,
    ) -> EngineResult<&Shift> {
        let (i, j) = self.shift_position(shift_id)?;
        let shift = &mut self.schedules[i].shifts[j];
        if shift.status.is_terminal() {
            return Err(EngineError::invalid_argument(
                "shift_id",
                format!("shift '{shift_id}' is {}", shift.status),
            ));
        }
        for role in Role::ALL {
            let assigned = shift.assigned_count(role);
            let quota = positions.get(&role).copied().unwrap_or(0);
            if assigned > quota {
                return Err(EngineError::invalid_argument(
                    "positions",
                    format!("{role} quota {quota} is below the {assigned} already assigned"),
                ));
            }
        }

        // The experience tier comes from the template, not the quota.
        let experience = shift.requirements.experience;
        let mut requirements =
            compute_requirements(&positions, shift.priority, TemplateCategory::Weekday);
        requirements.experience = experience;
        shift.requirements = requirements;
        shift.positions = positions;
        info!(shift_id = %shift_id, "Shift positions updated");

        self.touch(i);
        Ok(&self.schedules[i].shifts[j])
    }

    // ---- lifecycle ----

    /// Starts a scheduled shift.
    pub fn start_shift(&mut self, shift_id: &str) -> EngineResult<&Shift> {
        let (i, j) = self.shift_position(shift_id)?;
        start_shift(&mut self.schedules[i].shifts[j])?;
        self.events.push(DomainEvent::ShiftStarted {
            shift_id: shift_id.to_string(),
        });
        self.touch(i);
        Ok(&self.schedules[i].shifts[j])
    }

    /// Completes an active shift and records its realized performance.
    pub fn complete_shift(&mut self, shift_id: &str) -> EngineResult<ShiftPerformance> {
        let (i, j) = self.shift_position(shift_id)?;
        let performance = complete_shift(&mut self.schedules[i].shifts[j], self.roster.employees())?;
        self.events.push(DomainEvent::ShiftCompleted {
            shift_id: shift_id.to_string(),
            efficiency: performance.efficiency,
        });
        self.touch(i);
        Ok(performance)
    }

    /// Cancels a scheduled or active shift, releasing its employees' hours.
    /// Returns the released employee ids.
    pub fn cancel_shift(&mut self, shift_id: &str) -> EngineResult<Vec<String>> {
        let (i, j) = self.shift_position(shift_id)?;
        let released = cancel_shift(&mut self.schedules[i].shifts[j], &mut self.ledger)?;
        self.tasks.cancel_for_shift(shift_id);
        self.events.push(DomainEvent::ShiftCancelled {
            shift_id: shift_id.to_string(),
            released_employees: released.clone(),
        });
        self.touch(i);
        Ok(released)
    }

    /// Handles a shift-start boundary event.
    ///
    /// Redelivery for a shift that is already running is ignored and
    /// returns `false`.
    pub fn shift_started(&mut self, shift_id: &str) -> EngineResult<bool> {
        if self.get_shift(shift_id)?.status == ShiftStatus::Active {
            return Ok(false);
        }
        self.start_shift(shift_id)?;
        Ok(true)
    }

    /// Handles a shift-end boundary event.
    ///
    /// Redelivery for a shift that is already completed is ignored and
    /// returns `false`.
    pub fn shift_ended(&mut self, shift_id: &str) -> EngineResult<bool> {
        if self.get_shift(shift_id)?.status == ShiftStatus::Completed {
            return Ok(false);
        }
        self.complete_shift(shift_id)?;
        Ok(true)
    }

    // ---- time ----

    /// Handles a periodic tick. Each (kind, period) pair is acted on once;
    /// redelivery reports `duplicate` and changes nothing.
    pub fn handle_tick(&mut self, kind: TickKind, at: DateTime<Utc>) -> TickReport {
        let period_start = kind.period_start(at);
        let mut report = TickReport {
            kind,
            period_start,
            duplicate: false,
            schedules_created: Vec::new(),
            shifts_started: Vec::new(),
            shifts_completed: Vec::new(),
        };

        if !self.processed_ticks.insert((kind, period_start)) {
            info!(tick = ?kind, period_start = %period_start, "Duplicate tick ignored");
            report.duplicate = true;
            return report;
        }

        match kind {
            TickKind::Daily => {
                let week = week_start_of(at.date_naive());
                report.schedules_created.extend(self.ensure_schedule(week));
            }
            TickKind::Weekly => {
                let next_week = week_start_of(at.date_naive()) + Duration::days(7);
                report.schedules_created.extend(self.ensure_schedule(next_week));
            }
            TickKind::Hourly => {
                let now = at.naive_utc();
                let (to_start, to_complete) = self.due_boundaries(now);
                for shift_id in to_start {
                    match self.start_shift(&shift_id) {
                        Ok(_) => report.shifts_started.push(shift_id),
                        Err(err) => warn!(shift_id = %shift_id, error = %err, "Hourly start failed"),
                    }
                }
                for shift_id in to_complete {
                    match self.complete_shift(&shift_id) {
                        Ok(_) => report.shifts_completed.push(shift_id),
                        Err(err) => warn!(shift_id = %shift_id, error = %err, "Hourly completion failed"),
                    }
                }
            }
        }
        info!(
            tick = ?kind,
            period_start = %period_start,
            created = report.schedules_created.len(),
            started = report.shifts_started.len(),
            completed = report.shifts_completed.len(),
            "Tick handled"
        );
        report
    }

    /// Queues start and end tasks for every unfinished shift of a schedule.
    /// Returns how many tasks were added. Tasks already queued are skipped.
    pub fn plan_shift_boundaries(&mut self, schedule_id: &str) -> EngineResult<usize> {
        let index = self.schedule_index(schedule_id)?;
        let mut added = 0;
        for shift in &self.schedules[index].shifts {
            let mut planned = Vec::new();
            if shift.status == ShiftStatus::Scheduled {
                planned.push((
                    shift.start_time.and_utc(),
                    ScheduledTask::StartShift {
                        shift_id: shift.id.clone(),
                    },
                ));
            }
            if matches!(shift.status, ShiftStatus::Scheduled | ShiftStatus::Active) {
                planned.push((
                    shift.end_time.and_utc(),
                    ScheduledTask::EndShift {
                        shift_id: shift.id.clone(),
                    },
                ));
            }
            for (at, task) in planned {
                if !self.tasks.contains(&task) {
                    self.tasks.schedule_at(at, task);
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    /// Advances the task queue's logical time and fires every due task in
    /// order. Returns the tasks that fired.
    pub fn advance_to(&mut self, instant: DateTime<Utc>) -> Vec<ScheduledTask> {
        let due = self.tasks.advance_to(instant);
        let mut fired = Vec::with_capacity(due.len());
        for (_, task) in due {
            let result = match &task {
                ScheduledTask::StartShift { shift_id } => self.shift_started(shift_id),
                ScheduledTask::EndShift { shift_id } => self.shift_ended(shift_id),
            };
            if let Err(err) = result {
                warn!(shift_id = %task.shift_id(), error = %err, "Scheduled task failed");
            }
            fired.push(task);
        }
        fired
    }

    /// The task queue.
    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    // ---- feedback ----

    /// Reviews an employee over the period ending now and writes the result
    /// into their performance record.
    pub fn conduct_performance_review(
        &mut self,
        employee_id: &str,
        period: ReviewPeriod,
    ) -> EngineResult<PerformanceReview> {
        self.roster.get(employee_id)?;
        let now = self.clock.now();
        let since = now - period.length();
        let history = ReviewHistory {
            shifts_completed: self.completed_shifts(employee_id, Some(since)),
            trainings_completed: self.completed_trainings(employee_id, Some(since)),
        };
        let review_id = self.review_ids.next_id();
        let employee = self
            .roster
            .find_mut(employee_id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;
        let review = conduct_review(
            employee,
            review_id,
            period,
            &history,
            &self.config.review,
            now,
        );
        info!(
            employee_id = %employee_id,
            overall = review.overall,
            rating = %review.rating,
            "Performance review conducted"
        );
        self.events.push(DomainEvent::ReviewConducted {
            employee_id: employee_id.to_string(),
            overall: review.overall,
            rating: review.rating,
        });
        self.reviews.push(review.clone());
        Ok(review)
    }

    /// Enrols an employee in a training program.
    pub fn assign_training(
        &mut self,
        employee_id: &str,
        program_id: &str,
    ) -> EngineResult<TrainingRecord> {
        self.roster.get(employee_id)?;
        self.program(program_id)?;
        let record = TrainingRecord {
            id: self.training_ids.next_id(),
            employee_id: employee_id.to_string(),
            program_id: program_id.to_string(),
            status: TrainingStatus::Assigned,
            score: None,
            assigned_at: self.clock.now(),
            completed_at: None,
        };
        info!(training_id = %record.id, employee_id = %employee_id, program_id = %program_id, "Training assigned");
        self.events.push(DomainEvent::TrainingAssigned {
            training_id: record.id.clone(),
            employee_id: employee_id.to_string(),
            program_id: program_id.to_string(),
        });
        self.trainings.push(record.clone());
        Ok(record)
    }

    /// Completes a training with a score from 0 to 100 and applies its
    /// boosts. The next scheduling pass ranks on the updated record.
    pub fn complete_training(&mut self, training_id: &str, score: f64) -> EngineResult<TrainingEffect> {
        if !(0.0..=100.0).contains(&score) {
            return Err(EngineError::invalid_argument(
                "score",
                "must be between 0 and 100",
            ));
        }
        let index = self
            .trainings
            .iter()
            .position(|t| t.id == training_id)
            .ok_or_else(|| EngineError::TrainingNotFound {
                training_id: training_id.to_string(),
            })?;
        if self.trainings[index].status == TrainingStatus::Completed {
            return Err(EngineError::TrainingAlreadyCompleted {
                training_id: training_id.to_string(),
            });
        }

        let program = self.program(&self.trainings[index].program_id)?.clone();
        let employee_id = self.trainings[index].employee_id.clone();
        let employee = self
            .roster
            .find_mut(&employee_id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.clone(),
            })?;
        let effect = apply_training(employee, &program, score);

        let record = &mut self.trainings[index];
        record.status = TrainingStatus::Completed;
        record.score = Some(score);
        record.completed_at = Some(self.clock.now());

        info!(
            training_id = %training_id,
            employee_id = %employee_id,
            score,
            effectiveness = effect.effectiveness,
            "Training completed"
        );
        self.events.push(DomainEvent::TrainingCompleted {
            training_id: training_id.to_string(),
            employee_id,
            score,
        });
        Ok(effect)
    }

    /// Training records, in assignment order.
    pub fn trainings(&self) -> &[TrainingRecord] {
        &self.trainings
    }

    /// Reviews, oldest first.
    pub fn reviews(&self) -> &[PerformanceReview] {
        &self.reviews
    }

    /// An employee's current performance with their latest review.
    pub fn get_employee_performance(&self, employee_id: &str) -> EngineResult<EmployeePerformance> {
        let employee = self.roster.get(employee_id)?;
        Ok(EmployeePerformance {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            role: employee.role,
            record: employee.performance.clone(),
            skills: employee.skills.clone(),
            shifts_completed: self.completed_shifts(employee_id, None),
            trainings_completed: self.completed_trainings(employee_id, None),
            latest_review: self
                .reviews
                .iter()
                .rev()
                .find(|r| r.employee_id == employee_id)
                .cloned(),
        })
    }

    /// Team morale, productivity, turnover and satisfaction as of now.
    pub fn get_team_metrics(&mut self) -> TeamMetrics {
        team_metrics(
            self.roster.employees(),
            &self.ledger,
            &self.trainings,
            self.clock.now(),
            &self.config.morale,
            &mut self.morale_rng,
        )
    }

    // ---- collaborators ----

    /// Takes every buffered event, oldest first.
    pub fn drain_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    /// The roster.
    pub fn roster(&self) -> &dyn RosterRepository {
        self.roster.as_ref()
    }

    /// The roster, for the hiring side to add or update employees.
    pub fn roster_mut(&mut self) -> &mut dyn RosterRepository {
        self.roster.as_mut()
    }

    /// The weekly-hours ledger.
    pub fn ledger(&self) -> &HoursLedger {
        &self.ledger
    }

    /// The weekly-hours ledger, for recording hours committed elsewhere.
    pub fn ledger_mut(&mut self) -> &mut HoursLedger {
        &mut self.ledger
    }

    /// The engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- internals ----

    fn schedule_index(&self, schedule_id: &str) -> EngineResult<usize> {
        self.schedules
            .iter()
            .position(|s| s.id == schedule_id)
            .ok_or_else(|| EngineError::ScheduleNotFound {
                schedule_id: schedule_id.to_string(),
            })
    }

    fn shift_position(&self, shift_id: &str) -> EngineResult<(usize, usize)> {
        self.schedules
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.shifts.iter().position(|sh| sh.id == shift_id).map(|j| (i, j)))
            .ok_or_else(|| EngineError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            })
    }

    fn program(&self, program_id: &str) -> EngineResult<&TrainingProgram> {
        self.programs
            .iter()
            .find(|p| p.id == program_id)
            .ok_or_else(|| EngineError::TrainingProgramNotFound {
                program_id: program_id.to_string(),
            })
    }

    /// Re-derives a schedule's flags, totals and status after an edit.
    fn touch(&mut self, index: usize) {
        let schedule = &mut self.schedules[index];
        refresh_flags(schedule);
        refresh_totals(schedule, self.roster.employees());
        refresh_status(schedule);
        schedule.updated_at = self.clock.now();
    }

    fn push_understaffed_events(&mut self, flags: &[StaffingFlag]) {
        for flag in flags {
            if let StaffingFlag::Understaffed {
                shift_id,
                role,
                missing,
            } = flag
            {
                self.events.push(DomainEvent::ShiftUnderstaffed {
                    shift_id: shift_id.clone(),
                    role: *role,
                    missing: *missing,
                });
            }
        }
    }

    fn ensure_schedule(&mut self, week_start: NaiveDate) -> Option<String> {
        if self.schedules.iter().any(|s| s.week_start == week_start) {
            return None;
        }
        let options = self.config.tick_schedule_options.clone();
        self.create_weekly_schedule(week_start, &options)
            .map(|s| s.id.clone())
    }

    /// Shifts to start and to complete at `now`. A scheduled shift whose
    /// window has already elapsed appears in both lists.
    fn due_boundaries(&self, now: NaiveDateTime) -> (Vec<String>, Vec<String>) {
        let mut to_start = Vec::new();
        let mut to_complete = Vec::new();
        for shift in self.schedules.iter().flat_map(|s| s.shifts.iter()) {
            match shift.status {
                ShiftStatus::Scheduled if shift.start_time <= now => {
                    to_start.push(shift.id.clone());
                    if shift.end_time <= now {
                        to_complete.push(shift.id.clone());
                    }
                }
                ShiftStatus::Active if shift.end_time <= now => {
                    to_complete.push(shift.id.clone());
                }
                _ => {}
            }
        }
        (to_start, to_complete)
    }

    fn completed_shifts(&self, employee_id: &str, since: Option<DateTime<Utc>>) -> u32 {
        self.schedules
            .iter()
            .flat_map(|s| s.shifts.iter())
            .filter(|s| s.status == ShiftStatus::Completed)
            .filter(|s| since.is_none_or(|since| s.end_time.and_utc() >= since))
            .filter(|s| {
                s.assignments
                    .iter()
                    .any(|a| a.employee_id == employee_id && a.status == AssignmentStatus::Completed)
            })
            .count() as u32
    }

    fn completed_trainings(&self, employee_id: &str, since: Option<DateTime<Utc>>) -> u32 {
        self.trainings
            .iter()
            .filter(|t| t.employee_id == employee_id && t.status == TrainingStatus::Completed)
            .filter(|t| since.is_none_or(|since| t.completed_since(since)))
            .count() as u32
    }
}
