use std::sync::{Arc, Weak};

use crate::backend::InfoKind;
use crate::container::{truncate_comment, Container, Describable};
use crate::country::Country;
use crate::error::{EuromodResult, ProjectError};
use crate::extension::{link_extensions, Extension};
use crate::lazy::Lazy;
use crate::record::Record;
use crate::spine::{
    extension_repr, placement, upgrade, Identified, Parameter, Placement, Policy, SpineElement,
};
use crate::tags::field;

/// A function inside a policy.
#[derive(Debug)]
pub struct Function {
    /// Function ID.
    pub id: String,
    /// Function name, such as `ArithOp`.
    pub name: String,
    /// Free-text comment.
    pub comment: String,
    /// `yes` when the function is private.
    pub private: String,
    /// Order in the first system.
    pub order: String,
    /// Position in the country spine.
    pub spine_order: String,
    /// ID of the owning policy.
    pub pol_id: String,
    rank: i64,
    record: Record,
    policy: Weak<Policy>,
    parameters: Lazy<Container<Parameter>>,
    extensions: Lazy<Container<Extension>>,
}

impl Function {
    pub(crate) fn new(
        record: Record,
        placement: Placement,
        policy: Weak<Policy>,
    ) -> Result<Self, ProjectError> {
        let id = record.require(InfoKind::Function.tag(), field::ID)?.to_string();
        Ok(Self {
            id,
            name: record.get(field::NAME).to_string(),
            comment: record.get(field::COMMENT).to_string(),
            private: record.get_or(field::PRIVATE, "no"),
            order: placement.order,
            spine_order: record.get(field::SPINE_ORDER).to_string(),
            pol_id: record.get(field::POL_ID).to_string(),
            rank: placement.rank,
            record,
            policy,
            parameters: Lazy::new(),
            extensions: Lazy::new(),
        })
    }

    /// The owning policy.
    pub fn policy(&self) -> EuromodResult<Arc<Policy>> {
        upgrade(&self.policy, &format!("function {}", self.id))
    }

    /// The owning country.
    pub fn country(&self) -> EuromodResult<Arc<Country>> {
        self.policy()?.country()
    }

    /// Parameters of this function, sorted by their order in the first system.
    pub fn parameters(self: &Arc<Self>) -> EuromodResult<Arc<Container<Parameter>>> {
        let label = format!("function {}: parameters", self.id);
        self.parameters.get_or_load(&label, || {
            let country = self.country()?;
            let info = country.info()?;
            let systems = country.systems()?;
            let reference_system = systems.first().map(|s| s.id.clone());

            let mut parameters = Container::new();
            for record in info.pieces_of_info(InfoKind::Parameter, field::FUN_ID, &self.id)? {
                let at = placement(
                    info.as_ref(),
                    InfoKind::SystemParameter,
                    reference_system.as_deref(),
                    &record,
                )?;
                let parameter = Parameter::new(record, at, Arc::downgrade(self))?;
                parameters.add(parameter.id.clone(), parameter);
            }
            parameters.sort_by_key(|p: &Parameter| p.rank());
            Ok(parameters)
        })
    }
}

impl Identified for Function {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SpineElement for Function {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> &str {
        &self.order
    }

    fn rank(&self) -> i64 {
        self.rank
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn extensions(&self) -> EuromodResult<Arc<Container<Extension>>> {
        let label = format!("function {}: extensions", self.id);
        self.extensions.get_or_load(&label, || {
            let country = self.country()?;
            link_extensions(&country, InfoKind::ExtensionFunction, field::FUN_ID, &self.id)
        })
    }
}

impl Describable for Function {
    fn short_repr(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn middle_repr(&self) -> Option<String> {
        Some(extension_repr(self))
    }

    fn end_repr(&self) -> Option<String> {
        Some(truncate_comment(&self.comment))
    }
}
