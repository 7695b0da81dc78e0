//! Spine elements: policies, functions and parameters at country level.
//!
//! Spine elements share three behaviors:
//! - scalar attributes read eagerly from one backing-store record
//! - children and extensions loaded lazily on first access
//! - ordering by an externally supplied, string-encoded integer

mod function;
mod parameter;
mod policy;

use std::sync::{Arc, Weak};

use crate::backend::{CountryInfo, InfoKind};
use crate::container::Container;
use crate::error::{EuromodResult, ProjectError};
use crate::extension::Extension;
use crate::record::Record;
use crate::tags::field;

pub use function::Function;
pub use parameter::Parameter;
pub use policy::{Policy, PolicyKind};

/// Anything addressable by a country-level ID.
pub trait Identified {
    /// Country-level ID.
    fn id(&self) -> &str;
}

/// Shared surface of Policy, Function and Parameter.
pub trait SpineElement: Identified {
    /// Display name.
    fn name(&self) -> &str;

    /// Order as supplied by the backing store.
    fn order(&self) -> &str;

    /// Numeric value of [`SpineElement::order`], used for sorting.
    fn rank(&self) -> i64;

    /// Free-text comment.
    fn comment(&self) -> &str;

    /// The record the element was built from.
    fn record(&self) -> &Record;

    /// Extensions linked to this element, loaded on first access.
    fn extensions(&self) -> EuromodResult<Arc<Container<Extension>>>;
}

/// Position of an element among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub order: String,
    pub rank: i64,
}

/// Parses an order value; a blank order sorts after every numbered sibling.
pub(crate) fn parse_rank(id: &str, order: &str) -> Result<i64, ProjectError> {
    let trimmed = order.trim();
    if trimmed.is_empty() {
        return Ok(i64::MAX);
    }
    trimmed.parse().map_err(|_| ProjectError::InvalidOrder {
        id: id.to_string(),
        value: order.to_string(),
    })
}

/// Resolves an element's order.
///
/// The order lives on the element's record in the reference system
/// (`kind` is the system-scoped record kind). When there is no reference
/// system or no such record, the element's own `Order` field is used.
pub(crate) fn placement(
    info: &dyn CountryInfo,
    kind: InfoKind,
    reference_system: Option<&str>,
    record: &Record,
) -> EuromodResult<Placement> {
    let id = record.get(field::ID);
    let system_order = match reference_system {
        Some(sys) => info
            .piece_of_info(kind, &format!("{sys}{id}"))?
            .map(|r| r.get(field::ORDER).to_string())
            .filter(|order| !order.is_empty()),
        None => None,
    };
    let order = system_order.unwrap_or_else(|| record.get(field::ORDER).to_string());
    let rank = parse_rank(id, &order)?;
    Ok(Placement { order, rank })
}

/// Upgrades a parent back-reference.
pub(crate) fn upgrade<T>(parent: &Weak<T>, element: &str) -> EuromodResult<Arc<T>> {
    parent.upgrade().ok_or_else(|| {
        ProjectError::Detached {
            element: element.to_string(),
        }
        .into()
    })
}

/// Marker listing linked extensions, for container rows.
pub(crate) fn extension_marker(extensions: &Container<Extension>) -> String {
    if extensions.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = extensions.iter().map(|e| e.short_name.as_str()).collect();
    format!("(with switch set for {})", names.join(", "))
}

/// Extension marker of a spine element, or empty when it cannot be loaded.
pub(crate) fn extension_repr<E: SpineElement + ?Sized>(element: &E) -> String {
    match element.extensions() {
        Ok(extensions) => extension_marker(&extensions),
        Err(err) => {
            log::debug!("{}: extensions unavailable: {err}", element.id());
            String::new()
        }
    }
}
