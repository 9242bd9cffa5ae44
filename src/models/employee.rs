//! Employee model and related types.
//!
//! Employees are owned by the roster collaborator. The engine reads them when
//! ranking candidates and writes only their performance record and skill map.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The primary role an employee is hired into.
///
/// The ordering of variants is the fill priority used when an override role
/// picks which open slot to take: earlier variants are filled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Store manager. The default cross-role override role.
    Manager,
    /// Checkout operator.
    Cashier,
    /// Customer service desk.
    CustomerService,
    /// Shelf stocking and receiving.
    StockClerk,
    /// Loss prevention.
    Security,
    /// Cleaning and maintenance.
    Cleaner,
}

impl Role {
    /// All roles in fill-priority order.
    pub const ALL: [Role; 6] = [
        Role::Manager,
        Role::Cashier,
        Role::CustomerService,
        Role::StockClerk,
        Role::Security,
        Role::Cleaner,
    ];

    /// Returns true if a shift must not run without this role.
    pub fn is_critical(self) -> bool {
        matches!(self, Role::Manager | Role::Cashier)
    }

    /// Skills that make a candidate a better fit when this role is on a shift.
    pub fn preferred_skills(self) -> &'static [&'static str] {
        match self {
            Role::Manager => &["leadership", "customer_service"],
            Role::Cashier => &["cash_handling", "customer_service"],
            Role::CustomerService => &["customer_service", "communication"],
            Role::StockClerk => &["inventory", "organization"],
            Role::Security => &["loss_prevention", "communication"],
            Role::Cleaner => &["sanitation", "organization"],
        }
    }

    /// Returns the role's snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Cashier => "cashier",
            Role::CustomerService => "customer_service",
            Role::StockClerk => "stock_clerk",
            Role::Security => "security",
            Role::Cleaner => "cleaner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment status as maintained by the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Recently hired; schedulable but tracked separately.
    Probation,
    /// Fully active staff.
    Active,
    /// On leave or otherwise not working.
    Inactive,
    /// No longer employed.
    Terminated,
}

impl EmployeeStatus {
    /// Returns true if employees in this status may receive assignments.
    pub fn is_schedulable(self) -> bool {
        matches!(self, EmployeeStatus::Probation | EmployeeStatus::Active)
    }
}

/// A named part of the day an employee can work in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPeriod {
    /// 05:00 to 12:00.
    Morning,
    /// 12:00 to 17:00.
    Afternoon,
    /// 17:00 to 22:00.
    Evening,
    /// 22:00 to 05:00.
    Night,
}

impl AvailabilityPeriod {
    /// Maps a start time onto the period it falls in.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_engine::models::AvailabilityPeriod;
    /// use chrono::NaiveTime;
    ///
    /// let seven = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    /// assert_eq!(AvailabilityPeriod::from_time(seven), AvailabilityPeriod::Morning);
    ///
    /// let late = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
    /// assert_eq!(AvailabilityPeriod::from_time(late), AvailabilityPeriod::Night);
    /// ```
    pub fn from_time(time: NaiveTime) -> Self {
        match time.hour() {
            5..=11 => AvailabilityPeriod::Morning,
            12..=16 => AvailabilityPeriod::Afternoon,
            17..=21 => AvailabilityPeriod::Evening,
            _ => AvailabilityPeriod::Night,
        }
    }
}

/// Performance dimensions tracked for every employee, each in 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Output relative to role expectations.
    pub productivity: f64,
    /// Attendance and dependability.
    pub reliability: f64,
    /// Customer feedback.
    pub customer_satisfaction: f64,
    /// Collaboration with colleagues.
    pub teamwork: f64,
    /// Timeliness.
    pub punctuality: f64,
    /// The rating the ranker uses as its base score.
    pub overall_rating: f64,
}

impl Default for PerformanceRecord {
    fn default() -> Self {
        Self {
            productivity: 50.0,
            reliability: 50.0,
            customer_satisfaction: 50.0,
            teamwork: 50.0,
            punctuality: 50.0,
            overall_rating: 50.0,
        }
    }
}

/// An employee on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Primary role.
    pub role: Role,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Periods of the day the employee is willing to work.
    #[serde(default)]
    pub availability: BTreeSet<AvailabilityPeriod>,
    /// Skill proficiencies, each 0-100.
    #[serde(default)]
    pub skills: BTreeMap<String, f64>,
    /// Current performance record.
    #[serde(default)]
    pub performance: PerformanceRecord,
    /// Base hourly rate, used only for labour cost estimates.
    pub hourly_rate: Decimal,
    /// Number of shifts previously worked.
    #[serde(default)]
    pub experience: u32,
}

impl Employee {
    /// Returns the proficiency for a skill, or zero if the employee lacks it.
    pub fn skill(&self, name: &str) -> f64 {
        self.skills.get(name).copied().unwrap_or(0.0)
    }

    /// Returns true if the employee listed this period as available.
    pub fn is_available_in(&self, period: AvailabilityPeriod) -> bool {
        self.availability.contains(&period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(status: EmployeeStatus) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Avery".to_string(),
            role: Role::Cashier,
            status,
            availability: [AvailabilityPeriod::Morning, AvailabilityPeriod::Evening]
                .into_iter()
                .collect(),
            skills: [("cash_handling".to_string(), 72.0)].into_iter().collect(),
            performance: PerformanceRecord::default(),
            hourly_rate: Decimal::new(2450, 2),
            experience: 12,
        }
    }

    #[test]
    fn test_deserialize_employee_with_defaults() {
        let json = r#"{
            "id": "emp_002",
            "name": "Jordan",
            "role": "stock_clerk",
            "status": "probation",
            "hourly_rate": "22.10"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.role, Role::StockClerk);
        assert_eq!(employee.status, EmployeeStatus::Probation);
        assert_eq!(employee.hourly_rate, Decimal::new(2210, 2));
        assert!(employee.availability.is_empty());
        assert_eq!(employee.performance.overall_rating, 50.0);
        assert_eq!(employee.experience, 0);
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let employee = create_test_employee(EmployeeStatus::Active);
        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }

    #[test]
    fn test_schedulable_statuses() {
        assert!(EmployeeStatus::Probation.is_schedulable());
        assert!(EmployeeStatus::Active.is_schedulable());
        assert!(!EmployeeStatus::Inactive.is_schedulable());
        assert!(!EmployeeStatus::Terminated.is_schedulable());
    }

    #[test]
    fn test_period_boundaries() {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        assert_eq!(AvailabilityPeriod::from_time(at(4)), AvailabilityPeriod::Night);
        assert_eq!(AvailabilityPeriod::from_time(at(5)), AvailabilityPeriod::Morning);
        assert_eq!(AvailabilityPeriod::from_time(at(12)), AvailabilityPeriod::Afternoon);
        assert_eq!(AvailabilityPeriod::from_time(at(17)), AvailabilityPeriod::Evening);
        assert_eq!(AvailabilityPeriod::from_time(at(22)), AvailabilityPeriod::Night);
    }

    #[test]
    fn test_missing_skill_reads_as_zero() {
        let employee = create_test_employee(EmployeeStatus::Active);
        assert_eq!(employee.skill("cash_handling"), 72.0);
        assert_eq!(employee.skill("forklift"), 0.0);
    }

    #[test]
    fn test_role_serialization_and_order() {
        assert_eq!(
            serde_json::to_string(&Role::CustomerService).unwrap(),
            "\"customer_service\""
        );
        assert!(Role::Manager < Role::Cashier);
        assert_eq!(Role::StockClerk.to_string(), "stock_clerk");
        assert!(Role::Cashier.is_critical());
        assert!(!Role::Cleaner.is_critical());
    }
}
