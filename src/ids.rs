//! Composite identifiers for system-scoped views.
//!
//! A system view of a spine element is keyed by the system ID followed
//! directly by the element's country-level ID, with no separator. The
//! pair is recoverable as long as the system ID is known.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `(system ID, base ID)` pair naming a system-scoped view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeId {
    system_id: String,
    base_id: String,
}

impl CompositeId {
    /// Pairs a system ID with a country-level ID.
    #[must_use]
    pub fn new(system_id: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            base_id: base_id.into(),
        }
    }

    /// Recovers the pair from a concatenated ID, given the owning system's ID.
    ///
    /// Returns `None` when `composite` does not start with `system_id` or
    /// nothing remains after it.
    #[must_use]
    pub fn split(system_id: &str, composite: &str) -> Option<Self> {
        let base = composite.strip_prefix(system_id)?;
        if system_id.is_empty() || base.is_empty() {
            return None;
        }
        Some(Self::new(system_id, base))
    }

    /// The system part.
    #[must_use]
    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// The country-level part.
    #[must_use]
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// The concatenated form used as the backing-store key.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{}", self.system_id, self.base_id)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.system_id, self.base_id)
    }
}
