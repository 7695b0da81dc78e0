//! Run request assembly.
//!
//! [`RunOptions`] collects what a caller passes to `System::run`;
//! [`build_request`] validates it against the data and produces the
//! [`RunRequest`] the engine receives.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::ValidationError;
use crate::table::DataFrame;
use crate::tags::{config, INPUT_DIR};

/// Group value the engine reads as "no group".
pub const NO_GROUP_SENTINEL: i32 = i32::MIN;

/// Group part of a constant override key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    /// An explicit group label.
    Named(String),
    /// Encoded as [`NO_GROUP_SENTINEL`]; an empty string is ambiguous to the engine.
    Unspecified,
}

impl GroupKey {
    /// Maps the caller's group string to its wire form.
    #[must_use]
    pub fn encode(group: &str) -> Self {
        if group.is_empty() {
            Self::Unspecified
        } else {
            Self::Named(group.to_string())
        }
    }

    /// The integer sentinel, when this key is [`GroupKey::Unspecified`].
    #[must_use]
    pub const fn sentinel(&self) -> Option<i32> {
        match self {
            Self::Named(_) => None,
            Self::Unspecified => Some(NO_GROUP_SENTINEL),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(group) => f.write_str(group),
            Self::Unspecified => write!(f, "{NO_GROUP_SENTINEL}"),
        }
    }
}

/// Encoded `(constant name, group)` key of a constant override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstantKey {
    /// Constant name.
    pub name: String,
    /// Encoded group.
    pub group: GroupKey,
}

impl ConstantKey {
    /// Encodes a caller-supplied `(name, group)` pair.
    pub fn encode(name: &str, group: &str) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidOverride {
                reason: format!("empty constant name (group '{group}')"),
            });
        }
        Ok(Self {
            name: name.to_string(),
            group: GroupKey::encode(group),
        })
    }

    /// The `(name, group)` pair as the engine's string tuple.
    #[must_use]
    pub fn to_wire(&self) -> (String, String) {
        (self.name.clone(), self.group.to_string())
    }
}

/// Caller options for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    dataset_id: String,
    constants: Option<BTreeMap<(String, String), String>>,
    verbose: bool,
    output_path: PathBuf,
    addons: Vec<(String, String)>,
    switches: Vec<(String, bool)>,
    no_warnings: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dataset_id: String::new(),
            constants: None,
            verbose: true,
            output_path: PathBuf::new(),
            addons: Vec::new(),
            switches: Vec::new(),
            no_warnings: false,
        }
    }
}

impl RunOptions {
    /// Default options: verbose, no overrides, no addons or switches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset ID; when empty the data's recorded provenance is used.
    #[must_use]
    pub fn dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_id = id.into();
        self
    }

    /// Overrides one constant. An empty `group` means "no group".
    #[must_use]
    pub fn constant(
        mut self,
        name: impl Into<String>,
        group: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.constants
            .get_or_insert_with(BTreeMap::new)
            .insert((name.into(), group.into()), value.into());
        self
    }

    /// Replaces the whole override mapping.
    #[must_use]
    pub fn constants(mut self, constants: BTreeMap<(String, String), String>) -> Self {
        self.constants = Some(constants);
        self
    }

    /// Prints the completion line when set.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Directory the engine writes output files to; empty for none.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Integrates system `system` of addon `name` into the spine.
    #[must_use]
    pub fn addon(mut self, name: impl Into<String>, system: impl Into<String>) -> Self {
        self.addons.push((name.into(), system.into()));
        self
    }

    /// Switches the extension with short name `name` on or off.
    #[must_use]
    pub fn switch(mut self, name: impl Into<String>, on: bool) -> Self {
        self.switches.push((name.into(), on));
        self
    }

    /// Suppresses printing of engine warnings (errors are still printed).
    #[must_use]
    pub const fn no_warnings(mut self, no_warnings: bool) -> Self {
        self.no_warnings = no_warnings;
        self
    }

    /// The dataset ID as given.
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset_id
    }

    /// Constant overrides as given.
    #[must_use]
    pub const fn overrides(&self) -> Option<&BTreeMap<(String, String), String>> {
        self.constants.as_ref()
    }

    /// Whether the completion line is printed.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether engine warnings are hidden.
    #[must_use]
    pub const fn warnings_suppressed(&self) -> bool {
        self.no_warnings
    }
}

/// A fully assembled, validated engine request.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Configuration keys and values (`PATH_DATA`, `ADDON0`, ...).
    pub config: BTreeMap<String, String>,
    /// Numeric data as variables × observations.
    pub data: Array2<f64>,
    /// Variable names, one per row of `data`.
    pub variables: Vec<String>,
    /// Constant overrides with encoded keys.
    pub constants: BTreeMap<ConstantKey, String>,
    /// Directory holding the engine binaries; the engine runs from here
    /// instead of the process working directory.
    pub engine_dir: PathBuf,
}

impl RunRequest {
    /// The dataset ID the request was resolved to.
    #[must_use]
    pub fn dataset_id(&self) -> &str {
        self.config.get(config::ID_DATA).map_or("", String::as_str)
    }
}

/// Where a request is going: the project, country and system it runs.
#[derive(Debug, Clone, Copy)]
pub struct RunTarget<'a> {
    /// Project root.
    pub project: &'a Path,
    /// Country code.
    pub country: &'a str,
    /// System name.
    pub system: &'a str,
    /// Engine binary directory.
    pub engine_dir: &'a Path,
}

fn validate_addon(name: &str, system: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidAddon {
        name: name.to_string(),
        system: system.to_string(),
        reason: reason.to_string(),
    };
    if name.trim().is_empty() || system.trim().is_empty() {
        return Err(invalid("addon name and system must both be non-empty"));
    }
    if name.contains('|') || system.contains('|') {
        return Err(invalid("'|' is reserved as the name/system separator"));
    }
    Ok(())
}

fn validate_switch(name: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidSwitch {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.trim().is_empty() {
        return Err(invalid("extension short name must be non-empty"));
    }
    if name.contains('=') {
        return Err(invalid("'=' is reserved as the name/status separator"));
    }
    Ok(())
}

fn encode_constants(
    constants: Option<&BTreeMap<(String, String), String>>,
) -> Result<BTreeMap<ConstantKey, String>, ValidationError> {
    let mut out = BTreeMap::new();
    for ((name, group), value) in constants.into_iter().flatten() {
        out.insert(ConstantKey::encode(name, group)?, value.clone());
    }
    Ok(out)
}

/// Validates `options` against `data` and assembles the engine request.
pub fn build_request(
    target: RunTarget<'_>,
    data: &DataFrame,
    options: &RunOptions,
) -> Result<RunRequest, ValidationError> {
    data.validate()?;

    let provenance = data.provenance();
    let dataset_id = if options.dataset_id.is_empty() {
        provenance.id_data.clone().unwrap_or_default()
    } else {
        options.dataset_id.clone()
    };
    let data_path = provenance
        .path_data
        .clone()
        .unwrap_or_else(|| target.project.join(INPUT_DIR));

    let mut cfg = BTreeMap::new();
    cfg.insert(
        config::PATH_EUROMODFILES.to_string(),
        target.project.display().to_string(),
    );
    cfg.insert(config::PATH_DATA.to_string(), data_path.display().to_string());
    cfg.insert(
        config::PATH_OUTPUT.to_string(),
        options.output_path.display().to_string(),
    );
    cfg.insert(config::ID_DATA.to_string(), dataset_id);
    cfg.insert(config::COUNTRY.to_string(), target.country.to_string());
    cfg.insert(config::ID_SYSTEM.to_string(), target.system.to_string());

    for (i, (name, system)) in options.addons.iter().enumerate() {
        validate_addon(name, system)?;
        cfg.insert(format!("{}{i}", config::ADDON), format!("{name}|{system}"));
    }
    for (i, (name, on)) in options.switches.iter().enumerate() {
        validate_switch(name)?;
        let status = if *on { "on" } else { "off" };
        cfg.insert(format!("{}{i}", config::SWITCH), format!("{name}={status}"));
    }

    let constants = encode_constants(options.constants.as_ref())?;

    let (variables, matrix) = data.numeric_matrix();
    if variables.is_empty() {
        return Err(ValidationError::InvalidData {
            reason: "table has no numeric columns".to_string(),
        });
    }
    let transposed = matrix.t().as_standard_layout().into_owned();

    Ok(RunRequest {
        config: cfg,
        data: transposed,
        variables,
        constants,
        engine_dir: target.engine_dir.to_path_buf(),
    })
}
