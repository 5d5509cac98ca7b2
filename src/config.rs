//! Application configuration, read from a TOML file.
//!
//! Every section and field is optional in the file; missing values take the
//! defaults below.
//!
//! ```toml
//! [data]
//! exercise_path = "exercise.csv"
//! calories_path = "calories.csv"
//!
//! [pipeline]
//! id_column = "User_ID"
//! target_column = "Calories"
//! join_policy = "inner"
//!
//! [forest]
//! n_estimators = 500
//! max_depth = 6
//! seed = 42
//! ```

use crate::error::{Error, Result};
use crate::model::ForestConfig;
use crate::preprocessing::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub pipeline: PipelineConfig,
    pub forest: ForestConfig,
}

/// Locations of the two source files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub exercise_path: PathBuf,
    pub calories_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            exercise_path: PathBuf::from("exercise.csv"),
            calories_path: PathBuf::from("calories.csv"),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
