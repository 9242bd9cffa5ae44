//! Candidate ranking.
//!
//! Orders eligible employees for a shift by a composite score. Ranking never
//! excludes anyone; that is the eligibility layer's job.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RankingWeights;
use crate::models::{Employee, ExperienceTier, Role, Shift};

/// The parts a candidate's score is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Current overall rating.
    pub base: f64,
    /// Bonus for an open slot in the candidate's own role.
    pub role_match: f64,
    /// Bonus for prior experience.
    pub experience: f64,
    /// Bonus for preferred skills above the threshold.
    pub skill_match: f64,
    /// Bonus for stated availability, when preferences are considered.
    pub preference: f64,
    /// Fraction of the reliability score.
    pub reliability: f64,
    /// Random tie-break term.
    pub jitter: f64,
}

impl ScoreBreakdown {
    /// Sum of all parts.
    pub fn total(&self) -> f64 {
        self.base
            + self.role_match
            + self.experience
            + self.skill_match
            + self.preference
            + self.reliability
            + self.jitter
    }
}

/// A candidate with its score, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// The candidate.
    pub employee_id: String,
    /// The candidate's primary role.
    pub role: Role,
    /// Total score.
    pub score: f64,
    /// How the score was built.
    pub breakdown: ScoreBreakdown,
}

/// Scores one candidate for a shift.
///
/// The only source of non-determinism is `rng`, drawn once per call.
/// Eligible candidates are always available for the shift's period, so the
/// preference bonus is a uniform offset and never changes the order.
pub fn score_candidate<R: Rng>(
    employee: &Employee,
    shift: &Shift,
    consider_preferences: bool,
    weights: &RankingWeights,
    rng: &mut R,
) -> ScoreBreakdown {
    let role_match = if shift.open_slots(employee.role) > 0 {
        weights.role_match_bonus
    } else {
        0.0
    };

    let experience_units = employee.experience.min(weights.experience_cap) as f64;
    let tier_multiplier = match shift.requirements.experience {
        ExperienceTier::Experienced => weights.experienced_tier_multiplier,
        ExperienceTier::Any => 1.0,
    };
    let experience = experience_units * weights.experience_per_unit * tier_multiplier;

    let matched_skills = shift
        .requirements
        .preferred_skills
        .iter()
        .filter(|skill| employee.skill(skill) > weights.skill_threshold)
        .count();
    let skill_match = matched_skills as f64 * weights.skill_bonus;

    let preference = if consider_preferences && employee.is_available_in(shift.period()) {
        weights.preference_bonus
    } else {
        0.0
    };

    let jitter = if weights.jitter_max > 0.0 {
        rng.random_range(0.0..weights.jitter_max)
    } else {
        0.0
    };

    ScoreBreakdown {
        base: employee.performance.overall_rating,
        role_match,
        experience,
        skill_match,
        preference,
        reliability: employee.performance.reliability * weights.reliability_factor,
        jitter,
    }
}

/// Ranks candidates for a shift, best first.
///
/// Scores are drawn in the order candidates are given, so a fixed roster
/// order and a fixed seed give a fixed ranking. Exact score ties fall back
/// to employee id.
///
/// # Examples
///
/// ```
/// use shift_engine::config::RankingWeights;
/// use shift_engine::models::{Employee, EmployeeStatus, PerformanceRecord, Role};
/// use shift_engine::scheduling::{rank, ShiftTemplateCatalog};
/// use chrono::NaiveDate;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rust_decimal::Decimal;
///
/// let cashier = |id: &str, rating: f64| Employee {
///     id: id.to_string(),
///     name: id.to_string(),
///     role: Role::Cashier,
///     status: EmployeeStatus::Active,
///     availability: Default::default(),
///     skills: Default::default(),
///     performance: PerformanceRecord { overall_rating: rating, ..Default::default() },
///     hourly_rate: Decimal::from(24),
///     experience: 0,
/// };
/// let low = cashier("low", 60.0);
/// let high = cashier("high", 80.0);
///
/// let shift = ShiftTemplateCatalog::standard()
///     .instantiate_by_id("weekday_afternoon", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), "s1")
///     .unwrap();
/// let weights = RankingWeights { jitter_max: 0.0, ..Default::default() };
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let ranked = rank(&[&low, &high], &shift, false, &weights, &mut rng);
/// assert_eq!(ranked[0].employee_id, "high");
/// assert_eq!(ranked[1].employee_id, "low");
/// ```
pub fn rank<R: Rng>(
    candidates: &[&Employee],
    shift: &Shift,
    consider_preferences: bool,
    weights: &RankingWeights,
    rng: &mut R,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .map(|employee| {
            let breakdown = score_candidate(employee, shift, consider_preferences, weights, rng);
            RankedCandidate {
                employee_id: employee.id.clone(),
                role: employee.role,
                score: breakdown.total(),
                breakdown,
            }
        })
        .collect();

    ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.employee_id.cmp(&b.employee_id),
        other => other,
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityPeriod, EmployeeStatus, PerformanceRecord};
    use crate::scheduling::ShiftTemplateCatalog;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;

    fn no_jitter() -> RankingWeights {
        RankingWeights {
            jitter_max: 0.0,
            ..Default::default()
        }
    }

    fn shift(template: &str) -> Shift {
        ShiftTemplateCatalog::standard()
            .instantiate_by_id(template, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), "s1")
            .unwrap()
    }

    fn employee(id: &str, role: Role, rating: f64) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            role,
            status: EmployeeStatus::Active,
            availability: Default::default(),
            skills: Default::default(),
            performance: PerformanceRecord {
                overall_rating: rating,
                reliability: 50.0,
                ..Default::default()
            },
            hourly_rate: Decimal::from(25),
            experience: 0,
        }
    }

    #[test]
    fn test_base_role_and_reliability_parts() {
        let mut rng = StdRng::seed_from_u64(1);
        let cashier = employee("c1", Role::Cashier, 70.0);
        let breakdown = score_candidate(&cashier, &shift("weekday_afternoon"), false, &no_jitter(), &mut rng);
        assert_eq!(breakdown.base, 70.0);
        assert_eq!(breakdown.role_match, 20.0);
        assert_eq!(breakdown.reliability, 5.0);
        assert_eq!(breakdown.total(), 95.0);
    }

    #[test]
    fn test_no_role_match_without_open_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let manager = employee("m1", Role::Manager, 70.0);
        let breakdown = score_candidate(&manager, &shift("weekday_afternoon"), false, &no_jitter(), &mut rng);
        assert_eq!(breakdown.role_match, 0.0);
    }

    #[test]
    fn test_experience_is_capped_and_doubled_for_experienced_tier() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut veteran = employee("c1", Role::Cashier, 50.0);
        veteran.experience = 25;

        let any_tier = score_candidate(&veteran, &shift("weekday_afternoon"), false, &no_jitter(), &mut rng);
        assert_eq!(any_tier.experience, 20.0);

        let experienced_tier = score_candidate(&veteran, &shift("weekday_morning"), false, &no_jitter(), &mut rng);
        assert_eq!(experienced_tier.experience, 40.0);
    }

    #[test]
    fn test_skill_bonus_counts_skills_above_threshold() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cashier = employee("c1", Role::Cashier, 50.0);
        cashier.skills.insert("cash_handling".to_string(), 80.0);
        cashier.skills.insert("customer_service".to_string(), 50.0);
        cashier.skills.insert("communication".to_string(), 51.0);

        let breakdown = score_candidate(&cashier, &shift("weekday_afternoon"), false, &no_jitter(), &mut rng);
        assert_eq!(breakdown.skill_match, 10.0);
    }

    #[test]
    fn test_preference_bonus_only_when_requested() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cashier = employee("c1", Role::Cashier, 50.0);
        cashier.availability.insert(AvailabilityPeriod::Afternoon);
        let afternoon = shift("weekday_afternoon");

        let without = score_candidate(&cashier, &afternoon, false, &no_jitter(), &mut rng);
        let with = score_candidate(&cashier, &afternoon, true, &no_jitter(), &mut rng);
        assert_eq!(without.preference, 0.0);
        assert_eq!(with.preference, 10.0);
    }

    #[test]
    fn test_jitter_is_bounded_and_seeded() {
        let weights = RankingWeights::default();
        let cashier = employee("c1", Role::Cashier, 50.0);
        let afternoon = shift("weekday_afternoon");

        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let a = score_candidate(&cashier, &afternoon, false, &weights, &mut first);
            let b = score_candidate(&cashier, &afternoon, false, &weights, &mut second);
            assert!(a.jitter >= 0.0 && a.jitter < weights.jitter_max);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_rank_orders_descending_and_keeps_everyone() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = employee("a", Role::Cashier, 40.0);
        let b = employee("b", Role::Cashier, 90.0);
        let c = employee("c", Role::Security, 99.0);
        let ranked = rank(&[&a, &b, &c], &shift("weekday_afternoon"), false, &no_jitter(), &mut rng);

        let ids: Vec<&str> = ranked.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_exact_ties_break_by_id() {
        let mut rng = StdRng::seed_from_u64(3);
        let x = employee("x", Role::Cashier, 60.0);
        let y = employee("y", Role::Cashier, 60.0);
        let ranked = rank(&[&y, &x], &shift("weekday_afternoon"), false, &no_jitter(), &mut rng);
        assert_eq!(ranked[0].employee_id, "x");
    }
}
