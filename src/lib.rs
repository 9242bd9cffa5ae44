//! Workforce Scheduling & Shift-Assignment Engine
//!
//! This crate turns a roster of employees and a catalog of shift templates into
//! weekly schedules, drives each shift through its lifecycle, and feeds
//! reviews and training results back into the ratings the next schedule is
//! ranked on.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod roster;
pub mod scheduling;
