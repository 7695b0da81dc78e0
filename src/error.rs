//! Error types for the EUROMOD object model.
//!
//! All errors are strongly typed using thiserror, grouped by the
//! stage that raises them: input validation, container lookup,
//! project loading, backend access and simulation execution.

use thiserror::Error;

/// Validation errors raised before any engine interaction.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Input data is ragged or has no numeric column, or a country code is empty.
    #[error("Parameter 'data' must be a rectangular table: {reason}")]
    InvalidData {
        /// What is wrong with it.
        reason: String,
    },

    /// An addon name or system is empty or contains `|`.
    #[error("Incorrect addon definition ({name}|{system}): {reason}")]
    InvalidAddon {
        /// Addon name as given.
        name: String,
        /// Addon system as given.
        system: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An extension switch has no short name.
    #[error("Incorrect extension switch definition for '{name}': {reason}")]
    InvalidSwitch {
        /// Short name as given.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A constant override cannot be encoded.
    #[error("Parameter 'constantsToOverwrite' must map (constant name, group) to a value: {reason}")]
    InvalidOverride {
        /// What is wrong with it.
        reason: String,
    },

    /// A required builder or configuration field was not set.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Name of the field.
        field: String,
    },

    /// A serialized configuration could not be parsed.
    #[error("Invalid model configuration: {reason}")]
    InvalidConfig {
        /// Parser message.
        reason: String,
    },
}

/// Errors raised by positional or keyed container access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No element is stored under the key.
    #[error("Key not found: '{key}'")]
    KeyNotFound {
        /// The key looked up.
        key: String,
    },

    /// The position is outside the container.
    #[error("Index {index} out of range for container of length {len}")]
    IndexOutOfRange {
        /// The position looked up; negative counts from the end.
        index: i64,
        /// Length of the container.
        len: usize,
    },
}

/// Errors raised while materializing the project object graph.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Translation reported that the project is not a EUROMOD project.
    #[error("Country XML EM3 translation failed for '{country}'. Probably provided a non-EUROMOD project as an input path: {path}")]
    NotAEuromodProject {
        /// Country code.
        country: String,
        /// Project path.
        path: String,
    },

    /// The country directory could not be listed.
    #[error("Cannot list countries in project '{path}': {message}")]
    CountryDiscovery {
        /// Directory that was listed.
        path: String,
        /// Underlying I/O error.
        message: String,
    },

    /// An order value is neither blank nor an integer.
    #[error("Record '{id}' has a non-integer order value '{value}'")]
    InvalidOrder {
        /// ID of the offending record.
        id: String,
        /// The order value.
        value: String,
    },

    /// A record lacks a field the object model cannot do without.
    #[error("Record of kind {kind} is missing field '{field}'")]
    MissingRecordField {
        /// Record kind tag, such as `POL`.
        kind: String,
        /// Name of the missing field.
        field: String,
    },

    /// The element outlived the model that owns it.
    #[error("{element} is detached from its parent; the owning model was dropped")]
    Detached {
        /// Label of the element.
        element: String,
    },

    /// A data file could not be read or parsed.
    #[error("Cannot read dataset '{path}': {message}")]
    DataFile {
        /// Path of the file.
        path: String,
        /// What went wrong.
        message: String,
    },
}

/// Errors reported by an external collaborator (info handler, translator, engine).
#[derive(Debug, Error)]
pub enum BackendError {
    /// A country or model info handler failed.
    #[error("Info handler error: {message}")]
    InfoHandler {
        /// Handler message.
        message: String,
    },

    /// The country translator failed outright.
    #[error("Translator error: {message}")]
    Translator {
        /// Translator message.
        message: String,
    },

    /// The engine call itself failed.
    #[error("Engine error: {message}")]
    Engine {
        /// Engine message.
        message: String,
    },
}

/// Errors raised by a simulation run.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The engine ran but reported failure.
    #[error("Simulation for system {system} with dataset {dataset} aborted with errors.")]
    SimulationAborted {
        /// System name.
        system: String,
        /// Dataset ID.
        dataset: String,
    },

    /// A result table does not match its column names.
    #[error("Result table '{table}' has {actual} columns but {expected} column names")]
    MalformedTable {
        /// Table name.
        table: String,
        /// Number of column names.
        expected: usize,
        /// Number of matrix columns.
        actual: usize,
    },
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum EuromodError {
    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A container lookup failed.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// The project could not be loaded.
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// A collaborator failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A run failed.
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

impl EuromodError {
    /// Returns true if this is an input validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a container lookup error.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    /// Returns true if this error comes from loading the project.
    #[must_use]
    pub const fn is_project(&self) -> bool {
        matches!(self, Self::Project(_))
    }

    /// Returns true if the engine reported an aborted simulation.
    #[must_use]
    pub const fn is_simulation_aborted(&self) -> bool {
        matches!(
            self,
            Self::Execution(ExecutionError::SimulationAborted { .. })
        )
    }
}

/// Result type alias for crate operations.
pub type EuromodResult<T> = Result<T, EuromodError>;
