//! Configuration types for the scheduling engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a default
//! so partial files are accepted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{RatingBucket, Role, ScheduleOptions, ShiftTemplate, TrainingProgram};

/// Default cap on committed hours per employee per ISO week.
pub const DEFAULT_MAX_WEEKLY_HOURS: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Weights for the candidate ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Flat bonus when the candidate's role has an open slot.
    pub role_match_bonus: f64,
    /// Points per unit of prior experience.
    pub experience_per_unit: f64,
    /// Experience units beyond this count are ignored.
    pub experience_cap: u32,
    /// Multiplier on the experience bonus for shifts wanting experienced staff.
    pub experienced_tier_multiplier: f64,
    /// A preferred skill counts only above this proficiency.
    pub skill_threshold: f64,
    /// Points per matched preferred skill.
    pub skill_bonus: f64,
    /// Points when stated availability covers the shift period.
    pub preference_bonus: f64,
    /// Fraction of the reliability score added.
    pub reliability_factor: f64,
    /// Upper bound (exclusive) of the random tie-break term.
    pub jitter_max: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            role_match_bonus: 20.0,
            experience_per_unit: 2.0,
            experience_cap: 10,
            experienced_tier_multiplier: 2.0,
            skill_threshold: 50.0,
            skill_bonus: 5.0,
            preference_bonus: 10.0,
            reliability_factor: 0.1,
            jitter_max: 5.0,
        }
    }
}

/// Inputs to the team morale estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoraleSettings {
    /// Morale of an average employee before adjustments.
    pub baseline: f64,
    /// How strongly rating deviation from 50 moves morale.
    pub performance_weight: f64,
    /// Lower edge of the healthy weekly-hours band.
    pub target_min_hours: Decimal,
    /// Upper edge of the healthy weekly-hours band.
    pub target_max_hours: Decimal,
    /// Bonus for sitting inside the band.
    pub balanced_bonus: f64,
    /// Penalty per hour above the band.
    pub overwork_penalty_per_hour: f64,
    /// Penalty per hour below the band.
    pub underwork_penalty_per_hour: f64,
    /// Bonus per training completed in the last 30 days.
    pub training_bonus: f64,
    /// Cap on the total training bonus.
    pub training_bonus_cap: f64,
    /// Half-width of the per-employee random variation.
    pub variation: f64,
}

impl Default for MoraleSettings {
    fn default() -> Self {
        Self {
            baseline: 60.0,
            performance_weight: 0.4,
            target_min_hours: Decimal::from(30),
            target_max_hours: Decimal::from(40),
            balanced_bonus: 5.0,
            overwork_penalty_per_hour: 1.5,
            underwork_penalty_per_hour: 0.5,
            training_bonus: 3.0,
            training_bonus_cap: 15.0,
            variation: 5.0,
        }
    }
}

/// Score thresholds for review buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewThresholds {
    /// Minimum score for outstanding.
    pub outstanding: f64,
    /// Minimum score for exceeds-expectations.
    pub exceeds: f64,
    /// Minimum score for satisfactory.
    pub satisfactory: f64,
    /// Minimum score for needs-improvement.
    pub needs_improvement: f64,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            outstanding: 85.0,
            exceeds: 70.0,
            satisfactory: 50.0,
            needs_improvement: 35.0,
        }
    }
}

impl ReviewThresholds {
    /// Maps an overall score onto its bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_engine::config::ReviewThresholds;
    /// use shift_engine::models::RatingBucket;
    ///
    /// let thresholds = ReviewThresholds::default();
    /// assert_eq!(thresholds.bucket(85.0), RatingBucket::Outstanding);
    /// assert_eq!(thresholds.bucket(69.9), RatingBucket::Satisfactory);
    /// assert_eq!(thresholds.bucket(10.0), RatingBucket::Unsatisfactory);
    /// ```
    pub fn bucket(&self, score: f64) -> RatingBucket {
        if score >= self.outstanding {
            RatingBucket::Outstanding
        } else if score >= self.exceeds {
            RatingBucket::ExceedsExpectations
        } else if score >= self.satisfactory {
            RatingBucket::Satisfactory
        } else if score >= self.needs_improvement {
            RatingBucket::NeedsImprovement
        } else {
            RatingBucket::Unsatisfactory
        }
    }
}

/// Engine-wide settings, loaded from `engine.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on committed hours per employee per ISO week.
    pub max_weekly_hours: Decimal,
    /// Adds overnight templates to every day.
    pub twenty_four_hour_operation: bool,
    /// Role allowed to fill any open slot.
    pub override_role: Role,
    /// Ranking weights.
    pub ranking: RankingWeights,
    /// Morale inputs.
    pub morale: MoraleSettings,
    /// Review bucket thresholds.
    pub review: ReviewThresholds,
    /// Options used when a daily or weekly tick creates a schedule.
    pub tick_schedule_options: ScheduleOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_weekly_hours: DEFAULT_MAX_WEEKLY_HOURS,
            twenty_four_hour_operation: false,
            override_role: Role::Manager,
            ranking: RankingWeights::default(),
            morale: MoraleSettings::default(),
            review: ReviewThresholds::default(),
            tick_schedule_options: ScheduleOptions {
                auto_assign: true,
                consider_preferences: true,
                ..Default::default()
            },
        }
    }
}

/// Template catalog file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    /// Templates in the catalog.
    pub templates: Vec<ShiftTemplate>,
}

/// Training program file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingProgramsFile {
    /// Programs available for enrolment.
    pub programs: Vec<TrainingProgram>,
}
