//! Tax-benefit systems and running them.

use std::fmt;
use std::sync::{Arc, Weak};

use log::{debug, info};

use crate::backend::InfoKind;
use crate::container::{Container, Describable};
use crate::country::Country;
use crate::error::{EuromodResult, ExecutionError};
use crate::lazy::Lazy;
use crate::record::Record;
use crate::run::{build_request, report_diagnostics, RunOptions, RunTarget, Simulation};
use crate::spine::upgrade;
use crate::table::DataFrame;
use crate::tags::field;
use crate::view::{mirror_and_filter, DatasetInSystem, PolicyInSystem};

/// One tax-benefit system of a country, e.g. `SL_1996`.
#[derive(Debug)]
pub struct System {
    /// System ID.
    pub id: String,
    /// System name, such as `SL_1996`.
    pub name: String,
    /// Policy year.
    pub year: String,
    /// Free-text comment.
    pub comment: String,
    /// Currency of output amounts.
    pub currency_output: String,
    /// Currency of parameter amounts.
    pub currency_param: String,
    /// Income concept used to define the household head.
    pub head_def_inc: String,
    /// Position among the country's systems.
    pub order: String,
    /// `yes` when the system is private.
    pub private: String,
    /// The record the system was built from.
    pub record: Record,
    country: Weak<Country>,
    policies: Lazy<Container<PolicyInSystem>>,
    datasets: Lazy<Container<DatasetInSystem>>,
    bestmatch_datasets: Lazy<Container<DatasetInSystem>>,
}

impl System {
    pub(crate) fn new(record: Record, country: Weak<Country>) -> Self {
        Self {
            id: record.get(field::ID).to_string(),
            name: record.get(field::NAME).to_string(),
            year: record.get(field::YEAR).to_string(),
            comment: record.get(field::COMMENT).to_string(),
            currency_output: record.get(field::CURRENCY_OUTPUT).to_string(),
            currency_param: record.get(field::CURRENCY_PARAM).to_string(),
            head_def_inc: record.get(field::HEAD_DEF_INC).to_string(),
            order: record.get(field::ORDER).to_string(),
            private: record.get_or(field::PRIVATE, "no"),
            record,
            country,
            policies: Lazy::new(),
            datasets: Lazy::new(),
            bestmatch_datasets: Lazy::new(),
        }
    }

    /// The owning country.
    pub fn country(&self) -> EuromodResult<Arc<Country>> {
        upgrade(&self.country, &format!("system {}", self.name))
    }

    /// The country's policies that have a record in this system.
    pub fn policies(self: &Arc<Self>) -> EuromodResult<Arc<Container<PolicyInSystem>>> {
        let label = format!("system {}: policies", self.name);
        self.policies.get_or_load(&label, || {
            let policies = self.country()?.policies()?;
            mirror_and_filter(
                self,
                &policies,
                InfoKind::SystemPolicy,
                PolicyInSystem::from_mirror,
            )
        })
    }

    /// The country's datasets registered for this system.
    pub fn datasets(self: &Arc<Self>) -> EuromodResult<Arc<Container<DatasetInSystem>>> {
        let label = format!("system {}: datasets", self.name);
        self.datasets.get_or_load(&label, || {
            let datasets = self.country()?.datasets()?;
            mirror_and_filter(
                self,
                &datasets,
                InfoKind::SystemDataset,
                DatasetInSystem::from_mirror,
            )
        })
    }

    /// Best-match datasets of this system, keyed by dataset name.
    pub fn bestmatch_datasets(
        self: &Arc<Self>,
    ) -> EuromodResult<Arc<Container<DatasetInSystem>>> {
        let label = format!("system {}: best-match datasets", self.name);
        self.bestmatch_datasets.get_or_load(&label, || {
            let mut bestmatch = Container::new();
            for dataset in self.datasets()?.iter().filter(|d| d.best_match) {
                bestmatch.add(dataset.name(), Arc::clone(dataset));
            }
            Ok(bestmatch)
        })
    }

    /// Runs this system on `data`.
    ///
    /// The request is validated before the engine is called. Engine
    /// diagnostics are reported in engine order whether or not the run
    /// succeeds; a failed run is an error naming the system and dataset.
    pub fn run(&self, data: &DataFrame, options: &RunOptions) -> EuromodResult<Simulation> {
        let country = self.country()?;
        let session = country.session();
        let target = RunTarget {
            project: session.project(),
            country: &country.code,
            system: &self.name,
            engine_dir: session.engine_dir(),
        };
        let request = build_request(target, data, options)?;
        let dataset = request.dataset_id().to_string();
        let info_handler = country.info()?;

        debug!(
            "running {} on {} ({} variables, {} observations)",
            self.name,
            dataset,
            request.variables.len(),
            request.data.ncols()
        );
        let response = session.engine().run(&request, info_handler.as_ref())?;
        report_diagnostics(
            session.reporter(),
            &response.diagnostics,
            options.warnings_suppressed(),
        );

        if !response.success {
            return Err(ExecutionError::SimulationAborted {
                system: self.name.clone(),
                dataset,
            }
            .into());
        }

        let simulation = Simulation::from_response(&response, &request.config, options.overrides())?;
        if options.is_verbose() {
            session.reporter().line(&format!(
                "Simulation for system {} with dataset {} finished.",
                self.name, dataset
            ));
        }
        info!(
            "simulation {} finished: system {}, dataset {}, {} outputs",
            simulation.id,
            self.name,
            dataset,
            simulation.outputs.len()
        );
        Ok(simulation)
    }
}

impl Describable for System {
    fn short_repr(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System {}", self.name)
    }
}
