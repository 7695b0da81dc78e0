use std::sync::{Arc, Weak};

use crate::backend::InfoKind;
use crate::container::{truncate_comment, Container, Describable};
use crate::country::Country;
use crate::error::{EuromodResult, ProjectError};
use crate::extension::{link_extensions, Extension};
use crate::lazy::Lazy;
use crate::record::Record;
use crate::spine::{extension_repr, placement, upgrade, Function, Identified, Placement, SpineElement};
use crate::tags::field;

/// Whether a policy is defined in the country or points at another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// Defined in the country.
    Regular,
    /// A reference policy; its name is taken from the policy it points at.
    Reference {
        /// ID of the policy pointed at.
        ref_pol_id: String,
    },
}

/// A policy of a country's spine.
#[derive(Debug)]
pub struct Policy {
    /// Policy ID.
    pub id: String,
    /// Policy name; for a reference policy, the target's name.
    pub name: String,
    /// Free-text comment.
    pub comment: String,
    /// `yes` when the policy is private.
    pub private: String,
    /// Order in the reference system.
    pub order: String,
    /// Position in the country spine.
    pub spine_order: String,
    /// Regular or reference.
    pub kind: PolicyKind,
    rank: i64,
    record: Record,
    country: Weak<Country>,
    functions: Lazy<Container<Function>>,
    extensions: Lazy<Container<Extension>>,
}

impl Policy {
    pub(crate) fn new(
        record: Record,
        placement: Placement,
        kind: PolicyKind,
        name: String,
        country: Weak<Country>,
    ) -> Result<Self, ProjectError> {
        let store_kind = match kind {
            PolicyKind::Regular => InfoKind::Policy,
            PolicyKind::Reference { .. } => InfoKind::ReferencePolicy,
        };
        let id = record.require(store_kind.tag(), field::ID)?.to_string();
        Ok(Self {
            id,
            name,
            comment: record.get(field::COMMENT).to_string(),
            private: record.get_or(field::PRIVATE, "no"),
            order: placement.order,
            spine_order: record.get(field::SPINE_ORDER).to_string(),
            kind,
            rank: placement.rank,
            record,
            country,
            functions: Lazy::new(),
            extensions: Lazy::new(),
        })
    }

    /// Whether this is a reference policy.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self.kind, PolicyKind::Reference { .. })
    }

    /// The owning country.
    pub fn country(&self) -> EuromodResult<Arc<Country>> {
        upgrade(&self.country, &format!("policy {}", self.id))
    }

    /// Functions of this policy, sorted by order.
    ///
    /// A reference policy has none of its own.
    pub fn functions(self: &Arc<Self>) -> EuromodResult<Arc<Container<Function>>> {
        let label = format!("policy {}: functions", self.id);
        self.functions.get_or_load(&label, || self.load_functions())
    }

    fn load_functions(self: &Arc<Self>) -> EuromodResult<Container<Function>> {
        let country = self.country()?;
        let info = country.info()?;
        let systems = country.systems()?;
        let reference_system = systems.first().map(|s| s.id.clone());

        let mut functions = Container::new();
        for record in info.pieces_of_info(InfoKind::Function, field::POL_ID, &self.id)? {
            let at = placement(
                info.as_ref(),
                InfoKind::SystemFunction,
                reference_system.as_deref(),
                &record,
            )?;
            let function = Function::new(record, at, Arc::downgrade(self))?;
            functions.add(function.id.clone(), function);
        }
        functions.sort_by_key(|f: &Function| f.rank());
        Ok(functions)
    }
}

impl Identified for Policy {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SpineElement for Policy {
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
        let label = format!("policy {}: extensions", self.id);
        self.extensions.get_or_load(&label, || {
            let country = self.country()?;
            link_extensions(&country, InfoKind::ExtensionPolicy, field::POL_ID, &self.id)
        })
    }
}

impl Describable for Policy {
    fn short_repr(&self) -> Option<String> {
        match self.kind {
            PolicyKind::Regular => Some(self.name.clone()),
            PolicyKind::Reference { .. } => Some(format!("Reference Policy: {}", self.name)),
        }
    }

    fn middle_repr(&self) -> Option<String> {
        match self.kind {
            PolicyKind::Regular => Some(extension_repr(self)),
            PolicyKind::Reference { .. } => Some("Reference Policy".to_string()),
        }
    }

    fn end_repr(&self) -> Option<String> {
        match self.kind {
            PolicyKind::Regular => Some(truncate_comment(&self.comment)),
            PolicyKind::Reference { .. } => None,
        }
    }
}
