use std::sync::{Arc, Weak};

use crate::backend::InfoKind;
use crate::container::{Container, Describable};
use crate::error::EuromodResult;
use crate::extension::Extension;
use crate::ids::CompositeId;
use crate::lazy::Lazy;
use crate::record::Record;
use crate::spine::{extension_repr, upgrade, Policy, PolicyKind, SpineElement};
use crate::system::System;
use crate::tags::field;
use crate::view::{mirror_and_filter, FunctionInSystem, Mirrored};

/// A policy as it appears in one system.
#[derive(Debug)]
pub struct PolicyInSystem {
    /// System ID plus policy ID.
    pub id: CompositeId,
    /// On/off status in this system.
    pub switch: String,
    /// Order in this system.
    pub order: String,
    /// The per-system record.
    pub record: Record,
    policy: Arc<Policy>,
    system: Weak<System>,
    functions: Lazy<Container<FunctionInSystem>>,
}

impl PolicyInSystem {
    pub(crate) fn from_mirror(m: Mirrored<Policy>) -> Self {
        Self {
            switch: m.record.get(field::SWITCH).to_string(),
            order: m.record.get(field::ORDER).to_string(),
            id: m.id,
            record: m.record,
            policy: m.type_object,
            system: m.system,
            functions: Lazy::new(),
        }
    }

    /// Name of the underlying policy.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.policy.name
    }

    /// The country-level policy this view mirrors.
    #[must_use]
    pub const fn policy(&self) -> &Arc<Policy> {
        &self.policy
    }

    /// The owning system.
    pub fn system(&self) -> EuromodResult<Arc<System>> {
        upgrade(&self.system, &format!("policy {}", self.id))
    }

    /// Extensions of the underlying policy.
    pub fn extensions(&self) -> EuromodResult<Arc<Container<Extension>>> {
        self.policy.extensions()
    }

    /// Functions of the policy that have a record in this system.
    pub fn functions(self: &Arc<Self>) -> EuromodResult<Arc<Container<FunctionInSystem>>> {
        let label = format!("policy {}: functions in system", self.id);
        self.functions.get_or_load(&label, || {
            let system = self.system()?;
            let functions = self.policy.functions()?;
            mirror_and_filter(
                &system,
                &functions,
                InfoKind::SystemFunction,
                FunctionInSystem::from_mirror,
            )
        })
    }
}

impl Describable for PolicyInSystem {
    fn short_repr(&self) -> Option<String> {
        self.policy.short_repr()
    }

    fn middle_repr(&self) -> Option<String> {
        if let PolicyKind::Reference { .. } = self.policy.kind {
            return Some(self.switch.clone());
        }
        let marker = extension_repr(self.policy.as_ref());
        if marker.is_empty() {
            Some(self.switch.clone())
        } else {
            Some(format!("{} {marker}", self.switch))
        }
    }

    fn end_repr(&self) -> Option<String> {
        self.policy.end_repr()
    }
}
