use std::sync::{Arc, Weak};

use crate::container::{Container, Describable};
use crate::error::EuromodResult;
use crate::extension::Extension;
use crate::ids::CompositeId;
use crate::record::Record;
use crate::spine::{upgrade, Parameter, SpineElement};
use crate::system::System;
use crate::tags::field;
use crate::view::Mirrored;

/// A parameter's value in one system.
#[derive(Debug)]
pub struct ParameterInSystem {
    /// System ID plus parameter ID.
    pub id: CompositeId,
    /// Value in this system.
    pub value: String,
    /// Order in this system.
    pub order: String,
    /// The per-system record.
    pub record: Record,
    parameter: Arc<Parameter>,
    system: Weak<System>,
}

impl ParameterInSystem {
    pub(crate) fn from_mirror(m: Mirrored<Parameter>) -> Self {
        Self {
            value: m.record.get(field::VALUE).to_string(),
            order: m.record.get(field::ORDER).to_string(),
            id: m.id,
            record: m.record,
            parameter: m.type_object,
            system: m.system,
        }
    }

    /// Name of the underlying parameter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.parameter.name
    }

    /// Group label of the underlying parameter.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.parameter.group
    }

    /// The country-level parameter.
    #[must_use]
    pub const fn parameter(&self) -> &Arc<Parameter> {
        &self.parameter
    }

    /// The owning system.
    pub fn system(&self) -> EuromodResult<Arc<System>> {
        upgrade(&self.system, &format!("parameter {}", self.id))
    }

    /// Extensions of the underlying parameter.
    pub fn extensions(&self) -> EuromodResult<Arc<Container<Extension>>> {
        self.parameter.extensions()
    }
}

impl Describable for ParameterInSystem {
    fn short_repr(&self) -> Option<String> {
        Some(self.parameter.name.clone())
    }

    fn middle_repr(&self) -> Option<String> {
        Some(self.value.clone())
    }

    fn end_repr(&self) -> Option<String> {
        self.parameter.end_repr()
    }
}
