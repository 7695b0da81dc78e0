//! System-specific views of country-level elements.
//!
//! A view pairs a type object (a policy, function, parameter or dataset)
//! with the record describing it in one system. Views are keyed by the
//! composite `systemID + elementID`, and an element with no record in a
//! system has no view there.

mod dataset;
mod function;
mod parameter;
mod policy;

use std::sync::{Arc, Weak};

use log::debug;

use crate::backend::InfoKind;
use crate::container::Container;
use crate::error::EuromodResult;
use crate::ids::CompositeId;
use crate::record::Record;
use crate::spine::Identified;
use crate::system::System;

pub use dataset::DatasetInSystem;
pub use function::FunctionInSystem;
pub use parameter::ParameterInSystem;
pub use policy::PolicyInSystem;

/// Everything a view is built from.
pub(crate) struct Mirrored<P> {
    pub id: CompositeId,
    pub record: Record,
    pub type_object: Arc<P>,
    pub system: Weak<System>,
}

/// Mirrors `type_objects` into `system`.
///
/// For every type object, in order, the record of `kind` keyed by the
/// composite ID is fetched; objects without one are left out. Order is
/// preserved.
pub(crate) fn mirror_and_filter<P, V, B>(
    system: &Arc<System>,
    type_objects: &Container<P>,
    kind: InfoKind,
    build: B,
) -> EuromodResult<Container<V>>
where
    P: Identified,
    B: Fn(Mirrored<P>) -> V,
{
    let info = system.country()?.info()?;
    let mut views = Container::new();
    for type_object in type_objects {
        let id = CompositeId::new(system.id.as_str(), type_object.id());
        let key = id.key();
        let Some(record) = info.piece_of_info(kind, &key)? else {
            debug!("{kind} {key}: no record in system {}, omitted", system.name);
            continue;
        };
        let view = build(Mirrored {
            id,
            record,
            type_object: Arc::clone(type_object),
            system: Arc::downgrade(system),
        });
        views.add(key, view);
    }
    Ok(views)
}
