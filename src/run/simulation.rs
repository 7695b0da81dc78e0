//! Simulation results.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::container::Container;
use crate::error::ExecutionError;
use crate::run::response::EngineResponse;
use crate::table::DataFrame;

/// Unique identifier of one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationId(Uuid);

impl SimulationId {
    /// A fresh random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of a simulation run: result tables, diagnostics, and the
/// configuration the run used.
#[derive(Debug)]
pub struct Simulation {
    /// Identifies this run.
    pub id: SimulationId,
    /// When the result was decoded.
    pub finished_at: DateTime<Utc>,
    /// Result tables, indexable by name or position.
    pub outputs: Container<DataFrame>,
    /// Table names in output order.
    pub output_filenames: Vec<String>,
    /// Error and warning messages in engine order.
    pub errors: Vec<String>,
    /// Configuration the engine received.
    pub config_settings: BTreeMap<String, String>,
    /// Overrides as the caller supplied them, before group encoding.
    pub constants_to_overwrite: BTreeMap<(String, String), String>,
}

impl Simulation {
    /// Decodes an engine response.
    ///
    /// Tables are decoded only when the response reports success; the
    /// diagnostics are kept either way. A repeated table name replaces the
    /// earlier table in place. `config` and `constants` are copied so later
    /// changes by the caller do not show up here.
    pub fn from_response(
        response: &EngineResponse,
        config: &BTreeMap<String, String>,
        constants: Option<&BTreeMap<(String, String), String>>,
    ) -> Result<Self, ExecutionError> {
        let mut outputs = Container::new();
        let mut output_filenames = Vec::new();
        if response.success {
            for (name, table) in &response.tables {
                let frame = DataFrame::from_matrix(name, &table.data, &table.columns)?;
                if outputs.contains_key(name) {
                    warn!("engine returned table '{name}' twice; keeping the later one");
                } else {
                    output_filenames.push(name.clone());
                }
                outputs.add(name.clone(), frame);
            }
        }

        Ok(Self {
            id: SimulationId::new(),
            finished_at: Utc::now(),
            outputs,
            output_filenames,
            errors: response
                .diagnostics
                .iter()
                .map(|d| d.message.clone())
                .collect(),
            config_settings: config.clone(),
            constants_to_overwrite: constants.cloned().unwrap_or_default(),
        })
    }

    /// Looks an output table up by name.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&DataFrame> {
        self.outputs.get(name).ok().map(AsRef::as_ref)
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "output:")?;
        write!(f, "{}", self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;
    use crate::run::response::Diagnostic;

    fn table() -> Array2<f64> {
        Array2::from_shape_vec((3, 2), vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]).unwrap()
    }

    #[test]
    fn decodes_tables_in_order() {
        let response = EngineResponse::succeeded()
            .with_table("sl_1996_std", table(), vec!["idperson".into(), "ils_dispy".into()])
            .with_table("sl_1996_hh", table(), vec!["idhh".into(), "ils_dispy".into()]);
        let sim = Simulation::from_response(&response, &BTreeMap::new(), None).unwrap();

        assert_eq!(sim.output_filenames, ["sl_1996_std", "sl_1996_hh"]);
        assert_eq!(sim.outputs.len(), 2);
        let std = sim.output("sl_1996_std").unwrap();
        assert_eq!(std.n_rows(), 3);
        assert_eq!(std.numeric("ils_dispy").unwrap(), &[10.0, 20.0, 30.0]);
        assert!(sim.errors.is_empty());
    }

    #[test]
    fn failure_keeps_diagnostics_but_no_tables() {
        let response = EngineResponse::failed()
            .with_table("ignored", table(), vec!["a".into(), "b".into()])
            .with_diagnostic(Diagnostic::warning("first"))
            .with_diagnostic(Diagnostic::error("second"));
        let sim = Simulation::from_response(&response, &BTreeMap::new(), None).unwrap();

        assert!(sim.outputs.is_empty());
        assert!(sim.output_filenames.is_empty());
        assert_eq!(sim.errors, ["first", "second"]);
    }

    #[test]
    fn config_is_copied() {
        let mut config = BTreeMap::new();
        config.insert("ID_DATA".to_string(), "sl_demo".to_string());
        let mut constants = BTreeMap::new();
        constants.insert(("$x".to_string(), String::new()), "1".to_string());

        let sim =
            Simulation::from_response(&EngineResponse::succeeded(), &config, Some(&constants))
                .unwrap();
        config.insert("ID_DATA".to_string(), "changed".to_string());
        constants.clear();

        assert_eq!(sim.config_settings["ID_DATA"], "sl_demo");
        assert_eq!(sim.constants_to_overwrite.len(), 1);
    }

    #[test]
    fn repeated_table_name_is_listed_once() {
        let later = Array2::from_shape_vec((1, 2), vec![7.0, 70.0]).unwrap();
        let response = EngineResponse::succeeded()
            .with_table("t", table(), vec!["a".into(), "b".into()])
            .with_table("u", table(), vec!["a".into(), "b".into()])
            .with_table("t", later, vec!["a".into(), "b".into()]);
        let sim = Simulation::from_response(&response, &BTreeMap::new(), None).unwrap();

        assert_eq!(sim.output_filenames, ["t", "u"]);
        assert_eq!(sim.outputs.keys().collect::<Vec<_>>(), ["t", "u"]);
        assert_eq!(sim.output("t").unwrap().numeric("b").unwrap(), &[70.0]);
    }

    #[test]
    fn mismatched_column_names_fail_decoding() {
        let response = EngineResponse::succeeded().with_table("bad", table(), vec!["a".into()]);
        let err = Simulation::from_response(&response, &BTreeMap::new(), None).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
