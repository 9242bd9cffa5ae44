//! Performance reviews and training effects.
//!
//! These are the only functions that write an employee's performance record
//! or skill map. The ranker reads those fields fresh on the next scheduling
//! pass. Assignments already made are never re-ranked.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ReviewThresholds;
use crate::models::{Employee, PerformanceReview, ReviewPeriod, ReviewScores, Role, TrainingProgram};

/// Recent activity considered by a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewHistory {
    /// Shifts the employee completed inside the review window.
    pub shifts_completed: u32,
    /// Trainings the employee completed inside the review window.
    pub trainings_completed: u32,
}

/// Score offsets a role's duties put on each review dimension.
fn role_emphasis(role: Role) -> ReviewScores {
    let base = ReviewScores {
        productivity: 0.0,
        reliability: 0.0,
        customer_satisfaction: 0.0,
        teamwork: 0.0,
        punctuality: 0.0,
        quality: 0.0,
        initiative: 0.0,
    };
    match role {
        Role::Manager => ReviewScores {
            teamwork: 5.0,
            initiative: 5.0,
            ..base
        },
        Role::Cashier => ReviewScores {
            customer_satisfaction: 5.0,
            punctuality: 3.0,
            ..base
        },
        Role::CustomerService => ReviewScores {
            customer_satisfaction: 8.0,
            ..base
        },
        Role::StockClerk => ReviewScores {
            productivity: 5.0,
            quality: 3.0,
            ..base
        },
        Role::Security => ReviewScores {
            reliability: 5.0,
            punctuality: 5.0,
            ..base
        },
        Role::Cleaner => ReviewScores {
            quality: 5.0,
            productivity: 3.0,
            ..base
        },
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Computes per-dimension review scores.
///
/// Starts from the current performance record, adds the role's emphasis and
/// credits recent attendance and training. Every score is clamped to 0-100.
/// The record's dimensions are inputs only, so identical records and history
/// always yield identical scores.
pub fn review_scores(employee: &Employee, history: &ReviewHistory) -> ReviewScores {
    let record = &employee.performance;
    let emphasis = role_emphasis(employee.role);
    let attendance = history.shifts_completed.min(20) as f64;
    let average_skill = if employee.skills.is_empty() {
        0.0
    } else {
        employee.skills.values().sum::<f64>() / employee.skills.len() as f64
    };

    ReviewScores {
        productivity: clamp_score(record.productivity + attendance * 0.5 + emphasis.productivity),
        reliability: clamp_score(record.reliability + attendance * 0.25 + emphasis.reliability),
        customer_satisfaction: clamp_score(
            record.customer_satisfaction + emphasis.customer_satisfaction,
        ),
        teamwork: clamp_score(record.teamwork + emphasis.teamwork),
        punctuality: clamp_score(record.punctuality + emphasis.punctuality),
        quality: clamp_score(
            (record.productivity + record.customer_satisfaction) / 2.0 + emphasis.quality,
        ),
        initiative: clamp_score(
            40.0
                + average_skill * 0.2
                + history.trainings_completed.min(5) as f64 * 4.0
                + emphasis.initiative,
        ),
    }
}

/// Reviews an employee and writes the overall rating back into their record.
///
/// Dimension scores stay on the review. Only `overall_rating` changes, which
/// the ranker reads on the next scheduling pass.
pub fn conduct_review(
    employee: &mut Employee,
    review_id: String,
    period: ReviewPeriod,
    history: &ReviewHistory,
    thresholds: &ReviewThresholds,
    reviewed_at: DateTime<Utc>,
) -> PerformanceReview {
    let scores = review_scores(employee, history);
    let overall = scores.average();
    let rating = thresholds.bucket(overall);

    employee.performance.overall_rating = overall;

    PerformanceReview {
        id: review_id,
        employee_id: employee.id.clone(),
        period,
        scores,
        overall,
        rating,
        shifts_completed: history.shifts_completed,
        trainings_completed: history.trainings_completed,
        reviewed_at,
    }
}

/// Fraction of a program's boosts an employee receives for a given score.
///
/// # Examples
///
/// ```
/// use shift_engine::scheduling::training_effectiveness;
///
/// assert_eq!(training_effectiveness(90.0), 0.9);
/// assert_eq!(training_effectiveness(20.0), 0.5);
/// ```
pub fn training_effectiveness(score: f64) -> f64 {
    (score / 100.0).max(0.5)
}

/// Changes a completed training made to an employee's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEffect {
    /// Effectiveness the boosts were scaled by.
    pub effectiveness: f64,
    /// Skill values after the training.
    pub skills: BTreeMap<String, f64>,
    /// Overall rating after the training.
    pub overall_rating: f64,
}

/// Applies a completed program's boosts, scaled by effectiveness and capped
/// at 100.
pub fn apply_training(
    employee: &mut Employee,
    program: &TrainingProgram,
    score: f64,
) -> TrainingEffect {
    let effectiveness = training_effectiveness(score);
    let mut skills = BTreeMap::new();

    for (skill, boost) in &program.skill_boosts {
        let value = employee.skills.entry(skill.clone()).or_insert(0.0);
        *value = clamp_score(*value + boost * effectiveness);
        skills.insert(skill.clone(), *value);
    }

    let record = &mut employee.performance;
    record.overall_rating = clamp_score(record.overall_rating + program.rating_boost * effectiveness);

    TrainingEffect {
        effectiveness,
        skills,
        overall_rating: record.overall_rating,
    }
}
