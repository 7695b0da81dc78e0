//! Extensions: named, switchable modifications to a model or country.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::backend::InfoKind;
use crate::container::{Container, Describable};
use crate::country::Country;
use crate::error::EuromodResult;
use crate::record::Record;
use crate::tags::field;

/// Where an extension is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionScope {
    /// Defined for the whole model.
    Model,
    /// Defined only for the given country.
    Country(String),
}

/// A model-wide or country-local extension.
#[derive(Debug, Clone)]
pub struct Extension {
    /// Extension ID.
    pub id: String,
    /// Long name.
    pub name: String,
    /// Name used to switch the extension on or off in a run.
    pub short_name: String,
    /// Where it is defined.
    pub scope: ExtensionScope,
    /// The record the extension was built from.
    pub record: Record,
}

impl Extension {
    /// Builds an extension from its store record.
    #[must_use]
    pub fn from_record(record: Record, scope: ExtensionScope) -> Self {
        Self {
            id: record.get(field::ID).to_string(),
            name: record.get(field::NAME).to_string(),
            short_name: record.get(field::SHORT_NAME).to_string(),
            scope,
            record,
        }
    }

    /// Whether the extension belongs to a single country.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self.scope, ExtensionScope::Country(_))
    }
}

impl Describable for Extension {
    fn short_repr(&self) -> Option<String> {
        Some(self.short_name.clone())
    }

    fn middle_repr(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extension {} ({})", self.short_name, self.name)
    }
}

/// Builds an extension container from `(key, record)` pairs.
pub(crate) fn collect_extensions(
    rows: Vec<(String, Record)>,
    scope: &ExtensionScope,
) -> Container<Extension> {
    let mut extensions = Container::new();
    for (key, record) in rows {
        extensions.add(key, Extension::from_record(record, scope.clone()));
    }
    extensions
}

/// Resolves the extensions linked to one element.
///
/// Link records of `kind` whose `id_field` equals `id` name an extension
/// by `ExtensionID`. Country-local extensions shadow model-wide ones with
/// the same ID; links to unknown extensions are skipped.
pub(crate) fn link_extensions(
    country: &Arc<Country>,
    kind: InfoKind,
    id_field: &str,
    id: &str,
) -> EuromodResult<Container<Extension>> {
    let info = country.info()?;
    let links = info.pieces_of_info(kind, id_field, id)?;
    let mut linked = Container::new();
    if links.is_empty() {
        return Ok(linked);
    }

    let local = country.local_extensions()?;
    let global = match country.model() {
        Some(model) => Some(model.extensions()?),
        None => None,
    };

    for link in links {
        let ext_id = link.get(field::EXTENSION_ID);
        let found = local
            .get(ext_id)
            .ok()
            .or_else(|| global.as_ref().and_then(|g| g.get(ext_id).ok()));
        match found {
            Some(extension) => linked.add(ext_id, Arc::clone(extension)),
            None => debug!("{id}: link to unknown extension {ext_id} skipped"),
        }
    }
    Ok(linked)
}
