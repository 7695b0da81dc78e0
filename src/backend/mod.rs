//! Backend collaborators: info handlers, translator, and engine.
//!
//! The traits live in `traits`; `memory` holds in-memory implementations
//! used for embedding and tests.

mod memory;
mod traits;

pub use memory::{MemoryBackend, MemoryCountryInfo, MemoryModelInfo, RecordingEngine};
pub use traits::{Backend, CountryInfo, Engine, InfoKind, ModelInfo, ModelInfoKind};
