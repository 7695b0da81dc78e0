//! Countries: the root of each country's object graph.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Weak};

use crate::backend::{CountryInfo, InfoKind};
use crate::container::{Container, ContainerKey, Describable};
use crate::dataset::Dataset;
use crate::error::{EuromodError, EuromodResult, ProjectError};
use crate::extension::{collect_extensions, Extension, ExtensionScope};
use crate::lazy::Lazy;
use crate::model::{Model, Session};
use crate::spine::{placement, Policy, PolicyKind, SpineElement};
use crate::system::System;
use crate::table::{read_delimited, DataFrame};
use crate::tags::{field, INPUT_DIR};

/// A country of the model.
///
/// Nothing is read until first use. The first access to any attribute
/// translates the country and opens its info handler; systems, policies,
/// datasets and local extensions are then each loaded once.
pub struct Country {
    /// Country code, such as `SL`.
    pub code: String,
    model: Weak<Model>,
    session: Arc<Session>,
    info: Lazy<Arc<dyn CountryInfo>>,
    systems: Lazy<Container<System>>,
    policies: Lazy<Container<Policy>>,
    datasets: Lazy<Container<Dataset>>,
    local_extensions: Lazy<Container<Extension>>,
}

impl fmt::Debug for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Country")
            .field("code", &self.code)
            .field("info", &self.info.phase())
            .field("systems", &self.systems.phase())
            .field("policies", &self.policies.phase())
            .finish_non_exhaustive()
    }
}

impl Country {
    pub(crate) fn new(code: String, model: Weak<Model>, session: Arc<Session>) -> Self {
        Self {
            code,
            model,
            session,
            info: Lazy::new(),
            systems: Lazy::new(),
            policies: Lazy::new(),
            datasets: Lazy::new(),
            local_extensions: Lazy::new(),
        }
    }

    /// The owning model, if it is still alive.
    #[must_use]
    pub fn model(&self) -> Option<Arc<Model>> {
        self.model.upgrade()
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// The country's info handler.
    ///
    /// The first call translates the country. If the project turns out
    /// not to be a EUROMOD project the call fails and a later call tries
    /// again.
    pub fn info(&self) -> EuromodResult<Arc<dyn CountryInfo>> {
        let label = format!("country {}: info handler", self.code);
        let handler = self.info.get_or_load::<EuromodError, _>(&label, || {
            let project = self.session.project();
            let translated = self.session.backend().translate(
                project,
                &self.code,
                self.session.translate_options(),
            )?;
            if !translated {
                return Err(ProjectError::NotAEuromodProject {
                    country: self.code.clone(),
                    path: project.display().to_string(),
                }
                .into());
            }
            Ok(self.session.backend().country_info(project, &self.code)?)
        })?;
        Ok(Arc::clone(&*handler))
    }

    /// Systems in store order, keyed by name.
    pub fn systems(self: &Arc<Self>) -> EuromodResult<Arc<Container<System>>> {
        let label = format!("country {}: systems", self.code);
        self.systems.get_or_load(&label, || {
            let mut systems = Container::new();
            for (_, record) in self.info()?.type_info(InfoKind::System)? {
                let system = System::new(record, Arc::downgrade(self));
                systems.add(system.name.clone(), system);
            }
            Ok(systems)
        })
    }

    /// Looks a system up by name or position.
    pub fn system(self: &Arc<Self>, key: impl Into<ContainerKey>) -> EuromodResult<Arc<System>> {
        let systems = self.systems()?;
        let system = systems.lookup(key)?;
        Ok(Arc::clone(system))
    }

    /// Policies and reference policies, sorted by their order in the last
    /// system. Equal orders keep store order.
    pub fn policies(self: &Arc<Self>) -> EuromodResult<Arc<Container<Policy>>> {
        let label = format!("country {}: policies", self.code);
        self.policies.get_or_load(&label, || self.load_policies())
    }

    fn load_policies(self: &Arc<Self>) -> EuromodResult<Container<Policy>> {
        let info = self.info()?;
        let systems = self.systems()?;
        let reference_system = systems.last().map(|s| s.id.clone());
        let reference_system = reference_system.as_deref();

        let mut policies = Container::new();
        for (_, record) in info.type_info(InfoKind::Policy)? {
            let at = placement(info.as_ref(), InfoKind::SystemPolicy, reference_system, &record)?;
            let name = record.get(field::NAME).to_string();
            let policy =
                Policy::new(record, at, PolicyKind::Regular, name, Arc::downgrade(self))?;
            policies.add(policy.id.clone(), policy);
        }
        for (_, record) in info.type_info(InfoKind::ReferencePolicy)? {
            let at = placement(info.as_ref(), InfoKind::SystemPolicy, reference_system, &record)?;
            let ref_pol_id = record.get(field::REF_POL_ID).to_string();
            let name = info
                .piece_of_info(InfoKind::Policy, &ref_pol_id)?
                .map(|target| target.get(field::NAME).to_string())
                .unwrap_or_default();
            let kind = PolicyKind::Reference { ref_pol_id };
            let policy = Policy::new(record, at, kind, name, Arc::downgrade(self))?;
            policies.add(policy.id.clone(), policy);
        }
        policies.sort_by_key(|p: &Policy| p.rank());
        Ok(policies)
    }

    /// Datasets in store order, keyed by name.
    pub fn datasets(self: &Arc<Self>) -> EuromodResult<Arc<Container<Dataset>>> {
        let label = format!("country {}: datasets", self.code);
        self.datasets.get_or_load(&label, || {
            let mut datasets = Container::new();
            for (_, record) in self.info()?.type_info(InfoKind::Dataset)? {
                let dataset = Dataset::new(record, Arc::downgrade(self));
                datasets.add(dataset.name.clone(), dataset);
            }
            Ok(datasets)
        })
    }

    /// Extensions defined only for this country.
    pub fn local_extensions(&self) -> EuromodResult<Arc<Container<Extension>>> {
        let label = format!("country {}: local extensions", self.code);
        self.local_extensions.get_or_load(&label, || {
            let rows = self.info()?.type_info(InfoKind::LocalExtension)?;
            Ok(collect_extensions(
                rows,
                &ExtensionScope::Country(self.code.clone()),
            ))
        })
    }

    /// Reads the dataset `id` from `dir`, or from the project's `Input`
    /// directory when `dir` is `None`.
    pub fn load_data(&self, id: &str, dir: Option<&Path>) -> EuromodResult<DataFrame> {
        let frame = match dir {
            Some(dir) => read_delimited(dir, id)?,
            None => read_delimited(&self.session.project().join(INPUT_DIR), id)?,
        };
        Ok(frame)
    }
}

impl Describable for Country {
    fn short_repr(&self) -> Option<String> {
        Some(self.code.clone())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Country {}", self.code)
    }
}
