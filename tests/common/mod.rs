#![allow(dead_code)]

use std::sync::Arc;

use euromod::{
    Backend, DataFrame, EngineResponse, MemoryBackend, MemoryCountryInfo, MemoryReporter, Model,
    Record, RecordingEngine, Reporter,
};
use ndarray::Array2;

pub const PROJECT: &str = "/models/euromod";

pub struct Fixture {
    pub model: Arc<Model>,
    pub backend: Arc<MemoryBackend>,
    pub info: Arc<MemoryCountryInfo>,
    pub engine: Arc<RecordingEngine>,
    pub reporter: Arc<MemoryReporter>,
}

/// A model with SL registered and BE listed but not translatable.
pub fn fixture() -> Fixture {
    fixture_with(EngineResponse::succeeded())
}

pub fn fixture_with(response: EngineResponse) -> Fixture {
    let engine = Arc::new(RecordingEngine::new(response));
    let backend = Arc::new(MemoryBackend::new(engine.clone()));
    let info = Arc::new(MemoryCountryInfo::from_json(include_str!("../fixtures/sl.json")).unwrap());
    backend.add_country("SL", info.clone()).unwrap();
    backend
        .model()
        .insert_extension(
            Record::new()
                .with("ID", "ME1")
                .with("Name", "Tax compliance adjustment")
                .with("ShortName", "TCA"),
        )
        .unwrap();

    let reporter = Arc::new(MemoryReporter::new());
    let dyn_backend: Arc<dyn Backend> = backend.clone();
    let dyn_reporter: Arc<dyn Reporter> = reporter.clone();
    let model = Model::builder(PROJECT)
        .countries(["SL", "BE"])
        .engine_dir("/opt/euromod/bin")
        .backend(dyn_backend)
        .reporter(dyn_reporter)
        .build()
        .unwrap();

    Fixture {
        model,
        backend,
        info,
        engine,
        reporter,
    }
}

/// Three households with two numeric variables and one text column.
pub fn input_data() -> DataFrame {
    DataFrame::new()
        .with_numeric("idhh", vec![1.0, 2.0, 3.0])
        .with_text("region", vec!["north", "south", "east"])
        .with_numeric("yem", vec![1000.0, 1500.0, 0.0])
}

/// A 3 × 2 result table.
pub fn result_table() -> (Array2<f64>, Vec<String>) {
    let data =
        Array2::from_shape_vec((3, 2), vec![1.0, 800.0, 2.0, 1200.0, 3.0, 150.0]).unwrap();
    (data, vec!["idhh".to_string(), "ils_dispy".to_string()])
}
