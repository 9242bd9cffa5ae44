//! Performance review types.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The window a review looks back over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPeriod {
    /// The last 30 days.
    Monthly,
    /// The last 90 days.
    Quarterly,
    /// The last 365 days.
    Annual,
}

impl ReviewPeriod {
    /// Length of the look-back window.
    pub fn length(self) -> Duration {
        match self {
            ReviewPeriod::Monthly => Duration::days(30),
            ReviewPeriod::Quarterly => Duration::days(90),
            ReviewPeriod::Annual => Duration::days(365),
        }
    }
}

/// Qualitative bucket an overall score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBucket {
    /// Below the needs-improvement threshold.
    Unsatisfactory,
    /// At least 35 by default.
    NeedsImprovement,
    /// At least 50 by default.
    Satisfactory,
    /// At least 70 by default.
    ExceedsExpectations,
    /// At least 85 by default.
    Outstanding,
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RatingBucket::Unsatisfactory => "unsatisfactory",
            RatingBucket::NeedsImprovement => "needs_improvement",
            RatingBucket::Satisfactory => "satisfactory",
            RatingBucket::ExceedsExpectations => "exceeds_expectations",
            RatingBucket::Outstanding => "outstanding",
        };
        f.write_str(label)
    }
}

/// Per-dimension review scores, each 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewScores {
    /// Output relative to role expectations.
    pub productivity: f64,
    /// Attendance and dependability.
    pub reliability: f64,
    /// Customer feedback.
    pub customer_satisfaction: f64,
    /// Collaboration.
    pub teamwork: f64,
    /// Timeliness.
    pub punctuality: f64,
    /// Quality of work.
    pub quality: f64,
    /// Self-direction and learning.
    pub initiative: f64,
}

impl ReviewScores {
    /// Mean of all seven dimensions.
    pub fn average(&self) -> f64 {
        let total = self.productivity
            + self.reliability
            + self.customer_satisfaction
            + self.teamwork
            + self.punctuality
            + self.quality
            + self.initiative;
        total / 7.0
    }
}

/// A completed performance review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReview {
    /// Unique identifier for the review.
    pub id: String,
    /// The reviewed employee.
    pub employee_id: String,
    /// Review window.
    pub period: ReviewPeriod,
    /// Per-dimension scores.
    pub scores: ReviewScores,
    /// Mean of the dimension scores.
    pub overall: f64,
    /// Bucket the overall score maps to.
    pub rating: RatingBucket,
    /// Shifts completed inside the window.
    pub shifts_completed: u32,
    /// Trainings completed inside the window.
    pub trainings_completed: u32,
    /// When the review was conducted.
    pub reviewed_at: DateTime<Utc>,
}
