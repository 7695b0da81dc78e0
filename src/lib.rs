//! # euromod - Object model for EUROMOD tax-benefit projects
//!
//! This crate exposes a EUROMOD project as a lazily loaded object graph and
//! marshals simulation runs to and from the engine.
//!
//! ## Core Concepts
//!
//! - **Model**: A project root and its countries
//! - **Country**: Systems, policies, datasets and local extensions of one country
//! - **Spine**: Country-level policies, functions and parameters, ordered by the store
//! - **Views**: The same elements as they appear in one system, keyed by composite IDs
//! - **Simulation**: Output tables and diagnostics of one run
//!
//! Nothing below a country is read until first access, and each attribute
//! is read once. All project knowledge comes through the [`Backend`] trait.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use euromod::{Model, RunOptions};
//!
//! let model = Model::builder("/models/euromod")
//!     .backend(backend)
//!     .build()?;
//!
//! let sl = model.country("SL")?;
//! let system = sl.system("SL_1996")?;
//! let data = sl.load_data("sl_demo_v4", None)?;
//!
//! let sim = system.run(&data, &RunOptions::new().constant("$f_h_cpi", "", "100"))?;
//! println!("{}", sim.outputs.at(0)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Foundations
pub mod container;
pub mod error;
pub mod ids;
pub mod lazy;
pub mod record;
pub mod tags;

// Collaborators and configuration
pub mod backend;
pub mod config;

// Object graph
pub mod country;
pub mod dataset;
pub mod extension;
pub mod model;
pub mod spine;
pub mod system;
pub mod view;

// Runs
pub mod run;
pub mod table;

pub use backend::{
    Backend, CountryInfo, Engine, InfoKind, MemoryBackend, MemoryCountryInfo, MemoryModelInfo,
    ModelInfo, ModelInfoKind, RecordingEngine,
};
pub use config::{ModelConfig, ENGINE_DIR_ENV};
pub use container::{Container, ContainerKey, Describable};
pub use country::Country;
pub use dataset::Dataset;
pub use error::{
    BackendError, EuromodError, EuromodResult, ExecutionError, LookupError, ProjectError,
    ValidationError,
};
pub use extension::{Extension, ExtensionScope};
pub use ids::CompositeId;
pub use lazy::{Lazy, LoadPhase};
pub use model::{discover_countries, Model, ModelBuilder};
pub use record::Record;
pub use run::{
    build_request, ConstantKey, Diagnostic, EngineResponse, GroupKey, MemoryReporter, Reporter,
    ResultTable, RunOptions, RunRequest, RunTarget, Simulation, SimulationId, StdoutReporter,
    NO_GROUP_SENTINEL,
};
pub use spine::{Function, Identified, Parameter, Policy, PolicyKind, SpineElement};
pub use system::System;
pub use table::{read_delimited, Column, ColumnData, DataFrame, Provenance};
pub use view::{DatasetInSystem, FunctionInSystem, ParameterInSystem, PolicyInSystem};
