//! Core data models for the scheduling engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod event;
mod review;
mod schedule;
mod shift;
mod template;
mod training;

pub use employee::{AvailabilityPeriod, Employee, EmployeeStatus, PerformanceRecord, Role};
pub use event::DomainEvent;
pub use review::{PerformanceReview, RatingBucket, ReviewPeriod, ReviewScores};
pub use schedule::{Schedule, ScheduleOptions, ScheduleStatus, StaffingFlag};
pub use shift::{
    Assignment, AssignmentStatus, ExperienceTier, Shift, ShiftAction, ShiftPerformance,
    ShiftRequirements, ShiftStatus,
};
pub use template::{Priority, ShiftTemplate, TemplateCategory};
pub use training::{TrainingProgram, TrainingRecord, TrainingStatus};
