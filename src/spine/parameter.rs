use std::sync::{Arc, Weak};

use crate::backend::InfoKind;
use crate::container::{truncate_comment, Container, Describable};
use crate::country::Country;
use crate::error::{EuromodResult, ProjectError};
use crate::extension::{link_extensions, Extension};
use crate::lazy::Lazy;
use crate::record::Record;
use crate::spine::{extension_repr, upgrade, Function, Identified, Placement, SpineElement};
use crate::tags::field;

/// A parameter of a function. Parameters have no children.
#[derive(Debug)]
pub struct Parameter {
    /// Parameter ID.
    pub id: String,
    /// Parameter name.
    pub name: String,
    /// Free-text comment.
    pub comment: String,
    /// Order in the first system.
    pub order: String,
    /// Position in the country spine.
    pub spine_order: String,
    /// Group label; empty when the parameter is not grouped.
    pub group: String,
    /// ID of the owning function.
    pub fun_id: String,
    rank: i64,
    record: Record,
    function: Weak<Function>,
    extensions: Lazy<Container<Extension>>,
}

impl Parameter {
    pub(crate) fn new(
        record: Record,
        placement: Placement,
        function: Weak<Function>,
    ) -> Result<Self, ProjectError> {
        let id = record.require(InfoKind::Parameter.tag(), field::ID)?.to_string();
        Ok(Self {
            id,
            name: record.get(field::NAME).to_string(),
            comment: record.get(field::COMMENT).to_string(),
            order: placement.order,
            spine_order: record.get(field::SPINE_ORDER).to_string(),
            group: record.get(field::GROUP).to_string(),
            fun_id: record.get(field::FUN_ID).to_string(),
            rank: placement.rank,
            record,
            function,
            extensions: Lazy::new(),
        })
    }

    /// The owning function.
    pub fn function(&self) -> EuromodResult<Arc<Function>> {
        upgrade(&self.function, &format!("parameter {}", self.id))
    }

    /// The owning country.
    pub fn country(&self) -> EuromodResult<Arc<Country>> {
        self.function()?.country()
    }
}

impl Identified for Parameter {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SpineElement for Parameter {
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
        let label = format!("parameter {}: extensions", self.id);
        self.extensions.get_or_load(&label, || {
            let country = self.country()?;
            link_extensions(&country, InfoKind::ExtensionParameter, field::PAR_ID, &self.id)
        })
    }
}

impl Describable for Parameter {
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
