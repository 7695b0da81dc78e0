use std::sync::{Arc, Weak};

use crate::container::Describable;
use crate::dataset::Dataset;
use crate::error::EuromodResult;
use crate::ids::CompositeId;
use crate::record::Record;
use crate::spine::upgrade;
use crate::system::System;
use crate::tags::{field, YES};
use crate::view::Mirrored;

/// A dataset registered for one system.
#[derive(Debug)]
pub struct DatasetInSystem {
    /// System ID plus dataset ID.
    pub id: CompositeId,
    /// Whether this is a best-match dataset for the system.
    pub best_match: bool,
    /// The per-system record.
    pub record: Record,
    dataset: Arc<Dataset>,
    system: Weak<System>,
}

impl DatasetInSystem {
    pub(crate) fn from_mirror(m: Mirrored<Dataset>) -> Self {
        Self {
            best_match: m.record.get(field::BEST_MATCH) == YES,
            id: m.id,
            record: m.record,
            dataset: m.type_object,
            system: m.system,
        }
    }

    /// Name of the underlying dataset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.dataset.name
    }

    /// The country-level dataset.
    #[must_use]
    pub const fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// The owning system.
    pub fn system(&self) -> EuromodResult<Arc<System>> {
        upgrade(&self.system, &format!("dataset {}", self.id))
    }
}

impl Describable for DatasetInSystem {
    fn short_repr(&self) -> Option<String> {
        Some(self.dataset.name.clone())
    }

    fn middle_repr(&self) -> Option<String> {
        self.best_match.then(|| "best match".to_string())
    }

    fn end_repr(&self) -> Option<String> {
        self.dataset.end_repr()
    }
}
