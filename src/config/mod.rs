//! Configuration loading and management for the scheduling engine.
//!
//! This module provides functionality to load engine settings, the shift
//! template catalog and training programs from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use shift_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Weekly cap: {}h", config.engine().max_weekly_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_MAX_WEEKLY_HOURS, EngineConfig, MoraleSettings, RankingWeights, ReviewThresholds,
    TemplatesFile, TrainingProgramsFile,
};
