//! Scheduling logic for the shift engine.
//!
//! This module contains the stages a weekly schedule passes through: the
//! template catalog, eligibility predicates, candidate ranking, greedy
//! assignment backed by the weekly-hours ledger, weekly schedule building,
//! the shift lifecycle state machine, performance feedback and team metrics.
//! Time sources and the deterministic task queue live here as well.

mod assigner;
mod builder;
mod catalog;
mod clock;
mod eligibility;
mod feedback;
mod ids;
mod ledger;
mod lifecycle;
mod metrics;
mod ranking;

pub use assigner::{AssignmentOutcome, assign, best_fit_role};
pub use builder::{
    ScheduleBuilder, fill_shift, refresh_flags, refresh_status, refresh_totals, shift_cost,
    staffing_flags, templates_for_day, week_start_of,
};
pub use catalog::{ShiftTemplateCatalog, compute_requirements, instantiate};
pub use clock::{Clock, LogicalClock, ManualClock, ScheduledTask, SystemClock, TaskId, TaskQueue};
pub use eligibility::{eligible_candidates, is_available, is_compatible};
pub use feedback::{
    ReviewHistory, TrainingEffect, apply_training, conduct_review, review_scores,
    training_effectiveness,
};
pub use ids::IdSequence;
pub use ledger::{Commitment, HoursLedger, WeekKey};
pub use lifecycle::{cancel_shift, complete_shift, next_status, realized_performance, start_shift};
pub use metrics::{
    RECENT_TRAINING_DAYS, TeamMetrics, employee_morale, team_metrics, workload_adjustment,
};
pub use ranking::{RankedCandidate, ScoreBreakdown, rank, score_candidate};
