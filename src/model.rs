//! The model: entry point to a EUROMOD project.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::backend::{Backend, Engine, ModelInfoKind};
use crate::config::ModelConfig;
use crate::container::{Container, ContainerKey};
use crate::country::Country;
use crate::error::{EuromodResult, ProjectError, ValidationError};
use crate::extension::{collect_extensions, Extension, ExtensionScope};
use crate::lazy::Lazy;
use crate::run::{Reporter, StdoutReporter};
use crate::tags::COUNTRIES_DIR;

/// State shared by every object of one model.
pub(crate) struct Session {
    config: ModelConfig,
    backend: Arc<dyn Backend>,
    reporter: Arc<dyn Reporter>,
}

impl Session {
    pub(crate) fn project(&self) -> &Path {
        &self.config.project_path
    }

    pub(crate) fn engine_dir(&self) -> &Path {
        self.config.engine_dir()
    }

    pub(crate) fn translate_options(&self) -> &[String] {
        &self.config.translate_options
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub(crate) fn engine(&self) -> Arc<dyn Engine> {
        self.backend.engine()
    }

    pub(crate) fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }
}

/// A EUROMOD project and its countries.
///
/// Countries are created when the model is built; everything below them
/// is loaded on first access.
pub struct Model {
    countries: Container<Country>,
    session: Arc<Session>,
    extensions: Lazy<Container<Extension>>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("project", &self.session.project())
            .field("countries", &self.countries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Starts building a model for the project at `project_path`.
    pub fn builder(project_path: impl Into<PathBuf>) -> ModelBuilder {
        ModelBuilder::new(project_path)
    }

    /// Root of the project.
    #[must_use]
    pub fn project_path(&self) -> &Path {
        self.session.project()
    }

    /// Directory the engine runs from.
    #[must_use]
    pub fn engine_dir(&self) -> &Path {
        self.session.engine_dir()
    }

    /// Countries keyed by code, in discovery order.
    #[must_use]
    pub const fn countries(&self) -> &Container<Country> {
        &self.countries
    }

    /// Looks a country up by code or position.
    pub fn country(&self, key: impl Into<ContainerKey>) -> EuromodResult<Arc<Country>> {
        Ok(Arc::clone(self.countries.lookup(key)?))
    }

    /// Model-wide extensions, loaded on first access.
    pub fn extensions(&self) -> EuromodResult<Arc<Container<Extension>>> {
        self.extensions.get_or_load("model: extensions", || {
            let handler = self.session.backend().model_info(self.session.project())?;
            let rows = handler.model_info(ModelInfoKind::Extensions)?;
            Ok(collect_extensions(rows, &ExtensionScope::Model))
        })
    }
}

/// Lists the country directories under `<project>/XMLParam/Countries`,
/// sorted by name.
pub fn discover_countries(project: &Path) -> Result<Vec<String>, ProjectError> {
    let dir = COUNTRIES_DIR
        .iter()
        .fold(project.to_path_buf(), |path, part| path.join(part));
    let discovery_err = |message: String| ProjectError::CountryDiscovery {
        path: dir.display().to_string(),
        message,
    };

    let mut countries = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|e| discovery_err(e.to_string()))? {
        let entry = entry.map_err(|e| discovery_err(e.to_string()))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| discovery_err(e.to_string()))?
            .is_dir();
        if !is_dir {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => countries.push(name),
            Err(name) => debug!("skipping non-UTF-8 country directory {name:?}"),
        }
    }
    countries.sort();
    Ok(countries)
}

/// Builder for [`Model`].
#[must_use]
pub struct ModelBuilder {
    config: ModelConfig,
    backend: Option<Arc<dyn Backend>>,
    reporter: Option<Arc<dyn Reporter>>,
}

impl ModelBuilder {
    /// Starts from a default configuration for `project_path`.
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self::from_config(ModelConfig::new(project_path))
    }

    /// Starts from an existing configuration.
    pub const fn from_config(config: ModelConfig) -> Self {
        Self {
            config,
            backend: None,
            reporter: None,
        }
    }

    /// Exposes exactly these countries instead of listing the project.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    /// Directory holding the engine binaries.
    pub fn engine_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.engine_dir = Some(dir.into());
        self
    }

    /// Appends an option passed to the country translator.
    pub fn translate_option(mut self, option: impl Into<String>) -> Self {
        self.config.translate_options.push(option.into());
        self
    }

    /// Collaborators the model reads from and runs with. Required.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Where run output goes; defaults to stdout.
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Validates the configuration and creates the model.
    pub fn build(self) -> EuromodResult<Arc<Model>> {
        self.config.validate()?;
        let backend = self.backend.ok_or_else(|| ValidationError::MissingField {
            field: "backend".to_string(),
        })?;

        let codes = match self.config.countries.clone() {
            Some(codes) => codes,
            None => discover_countries(&self.config.project_path)?,
        };
        if let Some(code) = codes.iter().find(|c| c.trim().is_empty()) {
            return Err(ValidationError::InvalidData {
                reason: format!("country code {code:?} is empty"),
            }
            .into());
        }

        let reporter: Arc<dyn Reporter> = match self.reporter {
            Some(reporter) => reporter,
            None => Arc::new(StdoutReporter),
        };
        let session = Arc::new(Session {
            config: self.config,
            backend,
            reporter,
        });
        info!(
            "opened project {} with {} countries",
            session.project().display(),
            codes.len()
        );

        Ok(Arc::new_cyclic(|model| {
            let mut countries = Container::new();
            for code in codes {
                let country = Country::new(code.clone(), model.clone(), Arc::clone(&session));
                countries.add(code, country);
            }
            Model {
                countries,
                session,
                extensions: Lazy::new(),
            }
        }))
    }
}
