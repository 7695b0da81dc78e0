use std::sync::{Arc, Weak};

use crate::backend::InfoKind;
use crate::container::{Container, Describable};
use crate::error::EuromodResult;
use crate::extension::Extension;
use crate::ids::CompositeId;
use crate::lazy::Lazy;
use crate::record::Record;
use crate::spine::{extension_repr, upgrade, Function, SpineElement};
use crate::system::System;
use crate::tags::field;
use crate::view::{mirror_and_filter, Mirrored, ParameterInSystem};

/// A function as it appears in one system.
#[derive(Debug)]
pub struct FunctionInSystem {
    /// System ID plus function ID.
    pub id: CompositeId,
    /// Switch in this system: `on`, `off`, `n/a` or `toggle`.
    pub switch: String,
    /// Order in this system.
    pub order: String,
    /// The per-system record.
    pub record: Record,
    function: Arc<Function>,
    system: Weak<System>,
    parameters: Lazy<Container<ParameterInSystem>>,
}

impl FunctionInSystem {
    pub(crate) fn from_mirror(m: Mirrored<Function>) -> Self {
        Self {
            switch: m.record.get(field::SWITCH).to_string(),
            order: m.record.get(field::ORDER).to_string(),
            id: m.id,
            record: m.record,
            function: m.type_object,
            system: m.system,
            parameters: Lazy::new(),
        }
    }

    /// Name of the underlying function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// The country-level function.
    #[must_use]
    pub const fn function(&self) -> &Arc<Function> {
        &self.function
    }

    /// The owning system.
    pub fn system(&self) -> EuromodResult<Arc<System>> {
        upgrade(&self.system, &format!("function {}", self.id))
    }

    /// Extensions of the underlying function.
    pub fn extensions(&self) -> EuromodResult<Arc<Container<Extension>>> {
        self.function.extensions()
    }

    /// Parameters of the function that have a record in this system.
    pub fn parameters(self: &Arc<Self>) -> EuromodResult<Arc<Container<ParameterInSystem>>> {
        let label = format!("function {}: parameters in system", self.id);
        self.parameters.get_or_load(&label, || {
            let system = self.system()?;
            let parameters = self.function.parameters()?;
            mirror_and_filter(
                &system,
                &parameters,
                InfoKind::SystemParameter,
                ParameterInSystem::from_mirror,
            )
        })
    }
}

impl Describable for FunctionInSystem {
    fn short_repr(&self) -> Option<String> {
        Some(self.function.name.clone())
    }

    fn middle_repr(&self) -> Option<String> {
        let marker = extension_repr(self.function.as_ref());
        if marker.is_empty() {
            Some(self.switch.clone())
        } else {
            Some(format!("{} {marker}", self.switch))
        }
    }

    fn end_repr(&self) -> Option<String> {
        self.function.end_repr()
    }
}
