//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine settings,
//! the shift template catalog and training programs from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::TrainingProgram;
use crate::scheduling::ShiftTemplateCatalog;

use super::types::{EngineConfig, TemplatesFile, TrainingProgramsFile};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml             # Weekly cap, ranking weights, morale, review thresholds
/// ├── templates.yaml          # Shift template catalog
/// └── training_programs.yaml  # Training programs
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("{} templates loaded", loader.catalog().list_templates().len());
/// # Ok::<(), shift_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    engine: EngineConfig,
    catalog: ShiftTemplateCatalog,
    programs: Vec<TrainingProgram>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, contains invalid YAML, or
    /// defines a template that fails catalog validation.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine = Self::load_yaml::<EngineConfig>(&path.join("engine.yaml"))?;
        let templates = Self::load_yaml::<TemplatesFile>(&path.join("templates.yaml"))?;
        let programs =
            Self::load_yaml::<TrainingProgramsFile>(&path.join("training_programs.yaml"))?;

        let catalog = ShiftTemplateCatalog::from_templates(templates.templates)?;

        Ok(Self {
            engine,
            catalog,
            programs: programs.programs,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns the template catalog.
    pub fn catalog(&self) -> &ShiftTemplateCatalog {
        &self.catalog
    }

    /// Returns the training programs.
    pub fn programs(&self) -> &[TrainingProgram] {
        &self.programs
    }

    /// Consumes the loader and returns its parts.
    pub fn into_parts(self) -> (EngineConfig, ShiftTemplateCatalog, Vec<TrainingProgram>) {
        (self.engine, self.catalog, self.programs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use rust_decimal::Decimal;

    const CONFIG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default");

    #[test]
    fn test_load_shipped_config() {
        let loader = ConfigLoader::load(CONFIG_DIR).unwrap();
        assert_eq!(loader.engine().max_weekly_hours, Decimal::from(40));
        assert_eq!(loader.engine().override_role, Role::Manager);
        assert!(loader.catalog().get_template("weekday_morning").is_ok());
        assert!(loader.catalog().get_template("weekend_long").is_ok());
        assert!(
            loader
                .programs()
                .iter()
                .any(|p| p.id == "customer_excellence")
        );
    }

    #[test]
    fn test_missing_directory_reports_config_not_found() {
        let result = ConfigLoader::load("/nonexistent/config/dir");
        match result.unwrap_err() {
            EngineError::ConfigNotFound { path } => assert!(path.ends_with("engine.yaml")),
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_into_parts_returns_loaded_values() {
        let (engine, catalog, programs) = ConfigLoader::load(CONFIG_DIR).unwrap().into_parts();
        assert!(!engine.twenty_four_hour_operation);
        assert_eq!(catalog.list_templates().len(), 5);
        assert_eq!(programs.len(), 3);
    }
}
