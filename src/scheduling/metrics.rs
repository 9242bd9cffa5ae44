//! Team metrics.
//!
//! Read-only aggregation over the roster, the hours ledger and training
//! history. Morale carries a bounded random term per employee, so two calls
//! agree only when given identically seeded random sources.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::config::MoraleSettings;
use crate::models::{Employee, EmployeeStatus, TrainingRecord};

use super::ledger::{HoursLedger, WeekKey};

/// Trainings completed within this many days lift morale.
pub const RECENT_TRAINING_DAYS: i64 = 30;

/// Aggregate team health figures, each on a 0-100 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    /// Average morale of schedulable employees.
    pub morale: f64,
    /// Average productivity of schedulable employees.
    pub productivity: f64,
    /// Share of the roster that has been terminated, as a percentage.
    pub turnover: f64,
    /// Average customer satisfaction of schedulable employees.
    pub satisfaction: f64,
    /// Number of employees the averages were taken over.
    pub headcount: usize,
}

/// Morale contribution of one week's committed hours.
///
/// Inside the target band earns the balanced bonus; either side of it is
/// penalised per hour of distance.
pub fn workload_adjustment(hours: Decimal, settings: &MoraleSettings) -> f64 {
    let distance = |a: Decimal, b: Decimal| (a - b).to_f64().unwrap_or(0.0);
    if hours > settings.target_max_hours {
        -distance(hours, settings.target_max_hours) * settings.overwork_penalty_per_hour
    } else if hours < settings.target_min_hours {
        -distance(settings.target_min_hours, hours) * settings.underwork_penalty_per_hour
    } else {
        settings.balanced_bonus
    }
}

/// Morale of a single employee before averaging, clamped to 0-100.
pub fn employee_morale<R: Rng>(
    employee: &Employee,
    weekly_hours: Decimal,
    recent_trainings: usize,
    settings: &MoraleSettings,
    rng: &mut R,
) -> f64 {
    let performance = (employee.performance.overall_rating - 50.0) * settings.performance_weight;
    let workload = workload_adjustment(weekly_hours, settings);
    let training =
        (recent_trainings as f64 * settings.training_bonus).min(settings.training_bonus_cap);
    let variation = if settings.variation > 0.0 {
        rng.random_range(-settings.variation..=settings.variation)
    } else {
        0.0
    };

    (settings.baseline + performance + workload + training + variation).clamp(0.0, 100.0)
}

/// Computes team metrics as of `now`.
///
/// Averages cover probation and active employees; turnover covers the whole
/// roster. An empty roster yields all zeros.
pub fn team_metrics<R: Rng>(
    roster: &[Employee],
    ledger: &HoursLedger,
    trainings: &[TrainingRecord],
    now: DateTime<Utc>,
    settings: &MoraleSettings,
    rng: &mut R,
) -> TeamMetrics {
    if roster.is_empty() {
        return TeamMetrics::default();
    }

    let terminated = roster
        .iter()
        .filter(|e| e.status == EmployeeStatus::Terminated)
        .count();
    let turnover = terminated as f64 / roster.len() as f64 * 100.0;

    let team: Vec<&Employee> = roster.iter().filter(|e| e.status.is_schedulable()).collect();
    if team.is_empty() {
        return TeamMetrics {
            turnover,
            ..Default::default()
        };
    }

    let week = WeekKey::of(now.date_naive());
    let since = now - Duration::days(RECENT_TRAINING_DAYS);
    let count = team.len() as f64;

    let morale = team
        .iter()
        .map(|employee| {
            let recent = trainings
                .iter()
                .filter(|t| t.employee_id == employee.id && t.completed_since(since))
                .count();
            let hours = ledger.committed_hours(&employee.id, week);
            employee_morale(employee, hours, recent, settings, rng)
        })
        .sum::<f64>()
        / count;

    TeamMetrics {
        morale,
        productivity: team.iter().map(|e| e.performance.productivity).sum::<f64>() / count,
        turnover,
        satisfaction: team
            .iter()
            .map(|e| e.performance.customer_satisfaction)
            .sum::<f64>()
            / count,
        headcount: team.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PerformanceRecord, Role, TrainingStatus};
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn steady() -> MoraleSettings {
        MoraleSettings {
            variation: 0.0,
            ..Default::default()
        }
    }

    fn employee(id: &str, status: EmployeeStatus, rating: f64) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            role: Role::Cashier,
            status,
            availability: Default::default(),
            skills: Default::default(),
            performance: PerformanceRecord {
                overall_rating: rating,
                productivity: rating,
                customer_satisfaction: 60.0,
                ..Default::default()
            },
            hourly_rate: Decimal::from(25),
            experience: 0,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap()
    }

    fn completed_training(employee_id: &str, days_ago: i64) -> TrainingRecord {
        TrainingRecord {
            id: format!("trn_{employee_id}_{days_ago}"),
            employee_id: employee_id.to_string(),
            program_id: "cash_handling_basics".to_string(),
            status: TrainingStatus::Completed,
            score: Some(80.0),
            assigned_at: now() - Duration::days(days_ago + 1),
            completed_at: Some(now() - Duration::days(days_ago)),
        }
    }

    #[test]
    fn test_workload_band() {
        let settings = MoraleSettings::default();
        assert_eq!(workload_adjustment(Decimal::from(35), &settings), 5.0);
        assert_eq!(workload_adjustment(Decimal::from(44), &settings), -6.0);
        assert_eq!(workload_adjustment(Decimal::from(20), &settings), -5.0);
    }

    #[test]
    fn test_employee_morale_blends_terms() {
        let mut rng = StdRng::seed_from_u64(1);
        let emp = employee("e1", EmployeeStatus::Active, 80.0);
        let morale = employee_morale(&emp, Decimal::from(32), 2, &steady(), &mut rng);
        // 60 + 12 + 5 + 6
        assert!((morale - 83.0).abs() < 1e-9);
    }

    #[test]
    fn test_training_bonus_is_capped() {
        let mut rng = StdRng::seed_from_u64(1);
        let emp = employee("e1", EmployeeStatus::Active, 50.0);
        let morale = employee_morale(&emp, Decimal::from(32), 10, &steady(), &mut rng);
        assert!((morale - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_variation_is_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let settings = MoraleSettings::default();
        let emp = employee("e1", EmployeeStatus::Active, 50.0);
        for _ in 0..100 {
            let morale = employee_morale(&emp, Decimal::from(32), 0, &settings, &mut rng);
            assert!((60.0..=70.0).contains(&morale));
        }
    }

    #[test]
    fn test_team_metrics_over_roster() {
        let mut rng = StdRng::seed_from_u64(1);
        let roster = vec![
            employee("a", EmployeeStatus::Active, 80.0),
            employee("b", EmployeeStatus::Probation, 60.0),
            employee("c", EmployeeStatus::Terminated, 10.0),
            employee("d", EmployeeStatus::Inactive, 10.0),
        ];
        let mut ledger = HoursLedger::new();
        let week = WeekKey::of(now().date_naive());
        ledger.commit_external("a", "prior", week, Decimal::from(32));
        ledger.commit_external("b", "prior", week, Decimal::from(32));
        let trainings = vec![completed_training("a", 3), completed_training("b", 45)];

        let metrics = team_metrics(&roster, &ledger, &trainings, now(), &steady(), &mut rng);

        assert_eq!(metrics.headcount, 2);
        assert_eq!(metrics.turnover, 25.0);
        assert_eq!(metrics.productivity, 70.0);
        assert_eq!(metrics.satisfaction, 60.0);
        // a: 60 + 12 + 5 + 3, b: 60 + 4 + 5
        assert!((metrics.morale - 74.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_roster_yields_zeros() {
        let mut rng = StdRng::seed_from_u64(1);
        let metrics = team_metrics(&[], &HoursLedger::new(), &[], now(), &steady(), &mut rng);
        assert_eq!(metrics, TeamMetrics::default());
    }

    #[test]
    fn test_same_seed_same_metrics() {
        let roster = vec![
            employee("a", EmployeeStatus::Active, 80.0),
            employee("b", EmployeeStatus::Active, 40.0),
        ];
        let settings = MoraleSettings::default();
        let ledger = HoursLedger::new();
        let first = team_metrics(&roster, &ledger, &[], now(), &settings, &mut StdRng::seed_from_u64(9));
        let second = team_metrics(&roster, &ledger, &[], now(), &settings, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
