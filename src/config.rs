//! Model configuration.
//!
//! A [`ModelConfig`] names the project, the countries to expose and where
//! the engine lives. It can be built in code, deserialized from JSON, or
//! completed from the environment.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Environment variable naming the engine's binary directory.
pub const ENGINE_DIR_ENV: &str = "EUROMOD_ENGINE_DIR";

/// Settings for opening a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Root of the EUROMOD project.
    pub project_path: PathBuf,
    /// Countries to expose; `None` lists `XMLParam/Countries`.
    pub countries: Option<Vec<String>>,
    /// Directory holding the engine binaries; defaults to the project root.
    pub engine_dir: Option<PathBuf>,
    /// Extra options passed to the country translator.
    pub translate_options: Vec<String>,
}

impl ModelConfig {
    /// Configuration for the project at `project_path`; everything else defaults.
    #[must_use]
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Fills `engine_dir` from [`ENGINE_DIR_ENV`] when it is not set.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if self.engine_dir.is_none() {
            self.engine_dir = env::var_os(ENGINE_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }
        self
    }

    /// Effective engine directory.
    #[must_use]
    pub fn engine_dir(&self) -> &Path {
        self.engine_dir.as_deref().unwrap_or(&self.project_path)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.project_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingField {
                field: "project_path".to_string(),
            });
        }
        Ok(())
    }
}
