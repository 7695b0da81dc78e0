//! In-memory backend.
//!
//! This module provides thread-safe in-memory implementations of the
//! collaborator traits. It is intended for embedded usage, tests, and as
//! a reference for what the object model expects from a real backend.
//! Every info handler counts the queries it answers so callers can check
//! that lazy fields hit the store only once.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::backend::traits::{Backend, CountryInfo, Engine, InfoKind, ModelInfo, ModelInfoKind};
use crate::error::BackendError;
use crate::record::Record;
use crate::run::{EngineResponse, RunRequest};
use crate::tags::field;

fn lock_err(context: &'static str) -> BackendError {
    BackendError::InfoHandler {
        message: format!("poisoned lock: {context}"),
    }
}

fn translator_err(context: &'static str) -> BackendError {
    BackendError::Translator {
        message: format!("poisoned lock: {context}"),
    }
}

/// Key a record is stored under when no explicit key is given.
///
/// Type records use their `ID`; system-scoped records use the composite
/// `SysID + <base ID>` the object model queries them by.
fn default_key(kind: InfoKind, record: &Record) -> String {
    let base = match kind {
        InfoKind::SystemPolicy => field::POL_ID,
        InfoKind::SystemFunction => field::FUN_ID,
        InfoKind::SystemParameter => field::PAR_ID,
        InfoKind::SystemDataset => field::DATA_ID,
        _ => return record.get(field::ID).to_string(),
    };
    format!("{}{}", record.get(field::SYS_ID), record.get(base))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Keyed { key: String, record: Record },
    Plain(Record),
}

/// Thread-safe in-memory country info handler.
#[derive(Debug, Default)]
pub struct MemoryCountryInfo {
    state: RwLock<BTreeMap<InfoKind, Vec<(String, Record)>>>,
    queries: AtomicUsize,
}

impl MemoryCountryInfo {
    /// Create a new empty handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a handler from a JSON fixture.
    ///
    /// The fixture maps info-handler tags (`"SYS"`, `"SYS_POL"`, ...) to
    /// arrays of records. An entry is either a plain record, stored under
    /// its default key, or `{"key": ..., "record": {...}}`.
    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        let raw: BTreeMap<String, Vec<FixtureEntry>> =
            serde_json::from_str(json).map_err(|e| BackendError::InfoHandler {
                message: format!("invalid country fixture: {e}"),
            })?;

        let info = Self::new();
        for (tag, entries) in raw {
            let kind = InfoKind::from_tag(&tag).ok_or_else(|| BackendError::InfoHandler {
                message: format!("unknown record kind in fixture: {tag}"),
            })?;
            for entry in entries {
                match entry {
                    FixtureEntry::Keyed { key, record } => info.insert(kind, key, record)?,
                    FixtureEntry::Plain(record) => info.insert_record(kind, record)?,
                }
            }
        }
        Ok(info)
    }

    /// Stores `record` under `key`, replacing any record with the same key.
    pub fn insert(
        &self,
        kind: InfoKind,
        key: impl Into<String>,
        record: Record,
    ) -> Result<(), BackendError> {
        let key = key.into();
        let mut state = self.state.write().map_err(|_| lock_err("country.insert"))?;
        let records = state.entry(kind).or_default();
        if let Some(slot) = records.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = record;
        } else {
            records.push((key, record));
        }
        Ok(())
    }

    /// Stores `record` under its default key.
    pub fn insert_record(&self, kind: InfoKind, record: Record) -> Result<(), BackendError> {
        let key = default_key(kind, &record);
        self.insert(kind, key, record)
    }

    /// Number of queries answered so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

impl CountryInfo for MemoryCountryInfo {
    fn type_info(&self, kind: InfoKind) -> Result<Vec<(String, Record)>, BackendError> {
        self.count();
        let state = self.state.read().map_err(|_| lock_err("country.type_info"))?;
        Ok(state.get(&kind).cloned().unwrap_or_default())
    }

    fn piece_of_info(&self, kind: InfoKind, id: &str) -> Result<Option<Record>, BackendError> {
        self.count();
        let state = self.state.read().map_err(|_| lock_err("country.piece_of_info"))?;
        Ok(state
            .get(&kind)
            .and_then(|records| records.iter().find(|(k, _)| k == id))
            .map(|(_, record)| record.clone()))
    }

    fn pieces_of_info(
        &self,
        kind: InfoKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<Record>, BackendError> {
        self.count();
        let state = self.state.read().map_err(|_| lock_err("country.pieces_of_info"))?;
        Ok(state
            .get(&kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|(_, record)| record.get(field) == value)
                    .map(|(_, record)| record.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Thread-safe in-memory model info handler.
#[derive(Debug, Default)]
pub struct MemoryModelInfo {
    extensions: RwLock<Vec<(String, Record)>>,
    queries: AtomicUsize,
}

impl MemoryModelInfo {
    /// Creates an empty model info handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model-wide extension under its `ID`.
    pub fn insert_extension(&self, record: Record) -> Result<(), BackendError> {
        let key = record.get(field::ID).to_string();
        let mut extensions = self
            .extensions
            .write()
            .map_err(|_| lock_err("model.insert_extension"))?;
        extensions.push((key, record));
        Ok(())
    }

    /// Number of queries answered so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl ModelInfo for MemoryModelInfo {
    fn model_info(&self, kind: ModelInfoKind) -> Result<Vec<(String, Record)>, BackendError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match kind {
            ModelInfoKind::Extensions => {
                let extensions = self
                    .extensions
                    .read()
                    .map_err(|_| lock_err("model.model_info"))?;
                Ok(extensions.clone())
            }
        }
    }
}

/// Engine stub that answers every request with a fixed response and
/// keeps a copy of each request it received.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    response: RwLock<EngineResponse>,
    requests: RwLock<Vec<RunRequest>>,
}

impl RecordingEngine {
    /// Answers every request with `response`.
    #[must_use]
    pub fn new(response: EngineResponse) -> Self {
        Self {
            response: RwLock::new(response),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Replaces the response returned to subsequent requests.
    pub fn respond_with(&self, response: EngineResponse) -> Result<(), BackendError> {
        let mut slot = self.response.write().map_err(|_| BackendError::Engine {
            message: "poisoned lock: engine.respond_with".to_string(),
        })?;
        *slot = response;
        Ok(())
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RunRequest> {
        self.requests
            .read()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.read().map(|requests| requests.len()).unwrap_or(0)
    }
}

impl Engine for RecordingEngine {
    fn run(
        &self,
        request: &RunRequest,
        _country: &dyn CountryInfo,
    ) -> Result<EngineResponse, BackendError> {
        let engine_err = |context: &str| BackendError::Engine {
            message: format!("poisoned lock: {context}"),
        };
        self.requests
            .write()
            .map_err(|_| engine_err("engine.run.requests"))?
            .push(request.clone());
        let response = self
            .response
            .read()
            .map_err(|_| engine_err("engine.run.response"))?;
        Ok(response.clone())
    }
}

/// Backend holding every country's records in memory.
///
/// Translation succeeds exactly for the registered countries, so an
/// unregistered code behaves like a path that is not a EUROMOD project.
pub struct MemoryBackend {
    countries: RwLock<BTreeMap<String, Arc<MemoryCountryInfo>>>,
    broken: RwLock<BTreeMap<String, String>>,
    model: Arc<MemoryModelInfo>,
    engine: Arc<dyn Engine>,
    translations: AtomicUsize,
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let countries: Vec<String> = self
            .countries
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("MemoryBackend")
            .field("countries", &countries)
            .field("translations", &self.translation_count())
            .finish_non_exhaustive()
    }
}

impl MemoryBackend {
    /// Creates a backend with no countries that runs with `engine`.
    #[must_use]
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            countries: RwLock::new(BTreeMap::new()),
            broken: RwLock::new(BTreeMap::new()),
            model: Arc::new(MemoryModelInfo::new()),
            engine,
            translations: AtomicUsize::new(0),
        }
    }

    /// Registers a country's info handler under its code.
    pub fn add_country(
        &self,
        code: impl Into<String>,
        info: Arc<MemoryCountryInfo>,
    ) -> Result<(), BackendError> {
        let code = code.into();
        self.broken
            .write()
            .map_err(|_| translator_err("backend.add_country"))?
            .remove(&code);
        self.countries
            .write()
            .map_err(|_| lock_err("backend.add_country"))?
            .insert(code, info);
        Ok(())
    }

    /// Makes every translation of `code` fail with `message`, as a
    /// crashing translator would. Registering the country clears it.
    pub fn fail_translation(
        &self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), BackendError> {
        let mut broken = self
            .broken
            .write()
            .map_err(|_| translator_err("backend.fail_translation"))?;
        broken.insert(code.into(), message.into());
        Ok(())
    }

    /// The model-wide info handler.
    #[must_use]
    pub fn model(&self) -> &Arc<MemoryModelInfo> {
        &self.model
    }

    /// Number of translation calls received.
    #[must_use]
    pub fn translation_count(&self) -> usize {
        self.translations.load(Ordering::SeqCst)
    }

    fn lookup(&self, country: &str) -> Result<Option<Arc<MemoryCountryInfo>>, BackendError> {
        let countries = self
            .countries
            .read()
            .map_err(|_| lock_err("backend.lookup"))?;
        Ok(countries.get(country).cloned())
    }
}

impl Backend for MemoryBackend {
    fn translate(
        &self,
        _project: &Path,
        country: &str,
        _options: &[String],
    ) -> Result<bool, BackendError> {
        self.translations.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .broken
            .read()
            .map_err(|_| translator_err("backend.translate"))?
            .get(country)
            .cloned();
        if let Some(message) = failure {
            return Err(BackendError::Translator {
                message: format!("{country}: {message}"),
            });
        }
        Ok(self.lookup(country)?.is_some())
    }

    fn country_info(
        &self,
        _project: &Path,
        country: &str,
    ) -> Result<Arc<dyn CountryInfo>, BackendError> {
        let info: Arc<dyn CountryInfo> = self.lookup(country)?.ok_or_else(|| BackendError::InfoHandler {
            message: format!("country '{country}' has not been translated"),
        })?;
        Ok(info)
    }

    fn model_info(&self, _project: &Path) -> Result<Arc<dyn ModelInfo>, BackendError> {
        let model: Arc<dyn ModelInfo> = self.model.clone();
        Ok(model)
    }

    fn engine(&self) -> Arc<dyn Engine> {
        Arc::clone(&self.engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_records_use_composite_default_key() {
        let info = MemoryCountryInfo::new();
        info.insert_record(
            InfoKind::SystemPolicy,
            Record::new().with("SysID", "S1").with("PolID", "P7").with("Switch", "on"),
        )
        .unwrap();

        let rec = info.piece_of_info(InfoKind::SystemPolicy, "S1P7").unwrap().unwrap();
        assert_eq!(rec.get("Switch"), "on");
        assert!(info.piece_of_info(InfoKind::SystemPolicy, "S2P7").unwrap().is_none());
        assert_eq!(info.query_count(), 2);
    }

    #[test]
    fn pieces_of_info_filters_by_field() {
        let info = MemoryCountryInfo::new();
        for (id, pol) in [("F1", "P1"), ("F2", "P2"), ("F3", "P1")] {
            info.insert_record(
                InfoKind::Function,
                Record::new().with("ID", id).with("PolID", pol),
            )
            .unwrap();
        }
        let found = info.pieces_of_info(InfoKind::Function, "PolID", "P1").unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.get("ID")).collect();
        assert_eq!(ids, ["F1", "F3"]);
    }

    #[test]
    fn fixture_accepts_plain_and_keyed_entries() {
        let json = r#"{
            "SYS": [{"ID": "S1", "Name": "SL_1996"}],
            "SYS_DATA": [{"key": "S1D1", "record": {"BestMatch": "yes"}}]
        }"#;
        let info = MemoryCountryInfo::from_json(json).unwrap();
        let systems = info.type_info(InfoKind::System).unwrap();
        assert_eq!(systems[0].0, "S1");
        let data = info.piece_of_info(InfoKind::SystemDataset, "S1D1").unwrap().unwrap();
        assert_eq!(data.get("BestMatch"), "yes");
    }

    #[test]
    fn fixture_rejects_unknown_kind() {
        let err = MemoryCountryInfo::from_json(r#"{"NOPE": []}"#).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn translation_succeeds_only_for_registered_countries() {
        let backend = MemoryBackend::new(Arc::new(RecordingEngine::default()));
        backend.add_country("SL", Arc::new(MemoryCountryInfo::new())).unwrap();

        assert!(backend.translate(Path::new("/p"), "SL", &[]).unwrap());
        assert!(!backend.translate(Path::new("/p"), "XX", &[]).unwrap());
        assert_eq!(backend.translation_count(), 2);
        assert!(backend.country_info(Path::new("/p"), "XX").is_err());
    }

    #[test]
    fn broken_translator_reports_until_the_country_is_registered() {
        let backend = MemoryBackend::new(Arc::new(RecordingEngine::default()));
        backend.fail_translation("SL", "XML schema mismatch").unwrap();

        let err = backend.translate(Path::new("/p"), "SL", &[]).unwrap_err();
        assert!(matches!(err, BackendError::Translator { .. }));
        assert!(err.to_string().contains("SL: XML schema mismatch"));

        backend.add_country("SL", Arc::new(MemoryCountryInfo::new())).unwrap();
        assert!(backend.translate(Path::new("/p"), "SL", &[]).unwrap());
    }
}
