//! Collaborator traits for the EUROMOD object model.
//!
//! The object graph never reads project files itself. Everything it
//! knows comes through these traits:
//! - [`CountryInfo`] answers queries about one translated country
//! - [`ModelInfo`] answers model-wide queries (extensions)
//! - [`Engine`] executes a simulation request
//! - [`Backend`] translates countries and hands out the above

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::record::Record;
use crate::run::{EngineResponse, RunRequest};

/// Kinds of country-level records an info handler can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InfoKind {
    /// Systems.
    #[serde(rename = "SYS")]
    System,
    /// Policies.
    #[serde(rename = "POL")]
    Policy,
    /// Reference policies.
    #[serde(rename = "REFPOL")]
    ReferencePolicy,
    /// Functions.
    #[serde(rename = "FUN")]
    Function,
    /// Parameters.
    #[serde(rename = "PAR")]
    Parameter,
    /// Datasets.
    #[serde(rename = "DATA")]
    Dataset,
    /// Country-local extensions.
    #[serde(rename = "LOCAL_EXTENSION")]
    LocalExtension,
    /// Per-system policy records, keyed `SysID + PolID`.
    #[serde(rename = "SYS_POL")]
    SystemPolicy,
    /// Per-system function records, keyed `SysID + FunID`.
    #[serde(rename = "SYS_FUN")]
    SystemFunction,
    /// Per-system parameter records, keyed `SysID + ParID`.
    #[serde(rename = "SYS_PAR")]
    SystemParameter,
    /// Per-system dataset records, keyed `SysID + DataID`.
    #[serde(rename = "SYS_DATA")]
    SystemDataset,
    /// Extension links of policies.
    #[serde(rename = "EXTENSION_POL")]
    ExtensionPolicy,
    /// Extension links of functions.
    #[serde(rename = "EXTENSION_FUN")]
    ExtensionFunction,
    /// Extension links of parameters.
    #[serde(rename = "EXTENSION_PAR")]
    ExtensionParameter,
}

impl InfoKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::System,
        Self::Policy,
        Self::ReferencePolicy,
        Self::Function,
        Self::Parameter,
        Self::Dataset,
        Self::LocalExtension,
        Self::SystemPolicy,
        Self::SystemFunction,
        Self::SystemParameter,
        Self::SystemDataset,
        Self::ExtensionPolicy,
        Self::ExtensionFunction,
        Self::ExtensionParameter,
    ];

    /// Looks a kind up by its info-handler tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Tag used by the info handler for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::System => "SYS",
            Self::Policy => "POL",
            Self::ReferencePolicy => "REFPOL",
            Self::Function => "FUN",
            Self::Parameter => "PAR",
            Self::Dataset => "DATA",
            Self::LocalExtension => "LOCAL_EXTENSION",
            Self::SystemPolicy => "SYS_POL",
            Self::SystemFunction => "SYS_FUN",
            Self::SystemParameter => "SYS_PAR",
            Self::SystemDataset => "SYS_DATA",
            Self::ExtensionPolicy => "EXTENSION_POL",
            Self::ExtensionFunction => "EXTENSION_FUN",
            Self::ExtensionParameter => "EXTENSION_PAR",
        }
    }
}

impl fmt::Display for InfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kinds of model-level records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelInfoKind {
    /// Model-wide extensions.
    #[serde(rename = "EXTENSIONS")]
    Extensions,
}

/// Query interface over one translated country.
pub trait CountryInfo: Send + Sync {
    /// All records of `kind`, as `(key, record)` pairs in store order.
    fn type_info(&self, kind: InfoKind) -> Result<Vec<(String, Record)>, BackendError>;

    /// The record of `kind` stored under `id`, or `None` when there is none.
    ///
    /// For the system-scoped kinds `id` is a composite ID.
    fn piece_of_info(&self, kind: InfoKind, id: &str) -> Result<Option<Record>, BackendError>;

    /// All records of `kind` whose `field` equals `value`.
    fn pieces_of_info(
        &self,
        kind: InfoKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<Record>, BackendError>;
}

/// Query interface over model-wide information.
pub trait ModelInfo: Send + Sync {
    /// All records of `kind`, as `(key, record)` pairs in store order.
    fn model_info(&self, kind: ModelInfoKind) -> Result<Vec<(String, Record)>, BackendError>;
}

/// The simulation engine.
///
/// One call per run; the engine is never retried by this crate.
pub trait Engine: Send + Sync {
    /// Runs one simulation against the country the request names.
    fn run(
        &self,
        request: &RunRequest,
        country: &dyn CountryInfo,
    ) -> Result<EngineResponse, BackendError>;
}

/// Entry point to a project's external collaborators.
pub trait Backend: Send + Sync {
    /// Translates a country's XML into the engine's format.
    ///
    /// Returns `Ok(false)` when the path does not hold a EUROMOD project.
    /// Repeat calls for an already translated country are no-ops.
    fn translate(
        &self,
        project: &Path,
        country: &str,
        options: &[String],
    ) -> Result<bool, BackendError>;

    /// Builds the info handler for a translated country.
    fn country_info(
        &self,
        project: &Path,
        country: &str,
    ) -> Result<Arc<dyn CountryInfo>, BackendError>;

    /// Builds the model-wide info handler.
    fn model_info(&self, project: &Path) -> Result<Arc<dyn ModelInfo>, BackendError>;

    /// The engine used by `System::run`.
    fn engine(&self) -> Arc<dyn Engine>;
}
