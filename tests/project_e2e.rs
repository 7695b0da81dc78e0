mod common;

use std::fs;
use std::sync::Arc;

use euromod::{
    Backend, BackendError, EuromodError, MemoryBackend, MemoryCountryInfo, Model, ModelBuilder,
    ModelConfig, ProjectError, Record, RecordingEngine, RunOptions,
};

use common::fixture;

#[test]
fn untranslatable_country_fails_and_can_retry() {
    let fx = fixture();
    let be = fx.model.country("BE").unwrap();

    let err = be.systems().unwrap_err();
    assert!(matches!(
        err,
        EuromodError::Project(ProjectError::NotAEuromodProject { ref country, .. }) if country == "BE"
    ));
    assert!(err.to_string().contains("non-EUROMOD project"));
    assert_eq!(fx.backend.translation_count(), 1);

    // Registering the country afterwards makes the next access succeed.
    let info = MemoryCountryInfo::new();
    info.insert_record(
        euromod::InfoKind::System,
        Record::new().with("ID", "B1").with("Name", "BE_2020"),
    )
    .unwrap();
    fx.backend.add_country("BE", Arc::new(info)).unwrap();

    let systems = be.systems().unwrap();
    assert_eq!(systems.keys().collect::<Vec<_>>(), ["BE_2020"]);
    assert_eq!(fx.backend.translation_count(), 2);
}

#[test]
fn countries_are_discovered_from_the_project() {
    let project = tempfile::tempdir().unwrap();
    let countries = project.path().join("XMLParam").join("Countries");
    for code in ["SL", "AT"] {
        fs::create_dir_all(countries.join(code)).unwrap();
    }

    let backend: Arc<dyn Backend> =
        Arc::new(MemoryBackend::new(Arc::new(RecordingEngine::default())));
    let model = Model::builder(project.path()).backend(backend).build().unwrap();

    assert_eq!(model.countries().keys().collect::<Vec<_>>(), ["AT", "SL"]);
    assert_eq!(model.project_path(), project.path());
}

#[test]
fn missing_project_is_reported() {
    let project = tempfile::tempdir().unwrap();
    let backend: Arc<dyn Backend> =
        Arc::new(MemoryBackend::new(Arc::new(RecordingEngine::default())));

    let err = ModelBuilder::new(project.path().join("nowhere"))
        .backend(backend)
        .build()
        .unwrap_err();
    assert!(err.is_project());
}

#[test]
fn model_builds_from_json_config() {
    let config = ModelConfig::from_json(
        r#"{"project_path": "/models/euromod", "countries": ["SL"], "engine_dir": "/opt/em"}"#,
    )
    .unwrap();
    let backend: Arc<dyn Backend> =
        Arc::new(MemoryBackend::new(Arc::new(RecordingEngine::default())));

    let model = ModelBuilder::from_config(config)
        .backend(backend)
        .build()
        .unwrap();
    assert_eq!(model.engine_dir(), std::path::Path::new("/opt/em"));
    assert_eq!(model.countries().len(), 1);
}

#[test]
fn loaded_data_carries_provenance_into_the_run() {
    let input = tempfile::tempdir().unwrap();
    fs::write(
        input.path().join("sl_demo_v4.txt"),
        "idhh\tyem\tregion\n1\t1000\tnorth\n2\t1500.5\tsouth\n",
    )
    .unwrap();

    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let data = sl.load_data("sl_demo_v4", Some(input.path())).unwrap();
    assert_eq!(data.n_rows(), 2);
    assert_eq!(data.numeric("yem").unwrap(), &[1000.0, 1500.5]);
    assert!(data.numeric("region").is_none());

    let system = sl.system("SL_1996").unwrap();
    system.run(&data, &RunOptions::new().verbose(false)).unwrap();

    let request = &fx.engine.requests()[0];
    assert_eq!(request.dataset_id(), "sl_demo_v4");
    assert_eq!(
        request.config["PATH_DATA"],
        input.path().display().to_string()
    );
}

#[test]
fn missing_data_file_is_a_project_error() {
    let input = tempfile::tempdir().unwrap();
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();

    let err = sl.load_data("absent", Some(input.path())).unwrap_err();
    assert!(err.is_project());
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn blank_cells_still_reach_the_engine() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("gaps.txt"), "idhh\tyem\n1\t1000\n2\t\n").unwrap();

    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let data = sl.load_data("gaps", Some(input.path())).unwrap();
    sl.system("SL_1996")
        .unwrap()
        .run(&data, &RunOptions::new().verbose(false))
        .unwrap();

    let request = &fx.engine.requests()[0];
    assert_eq!(request.variables, ["idhh", "yem"]);
    assert!(request.data[[1, 1]].is_nan());
}

#[test]
fn translator_failure_surfaces_as_backend_error() {
    let fx = fixture();
    fx.backend.fail_translation("BE", "XML schema mismatch").unwrap();
    let be = fx.model.country("BE").unwrap();

    let err = be.policies().unwrap_err();
    assert!(matches!(
        err,
        EuromodError::Backend(BackendError::Translator { ref message }) if message.contains("BE")
    ));

    // The failed load is not cached.
    fx.backend.add_country("BE", Arc::new(MemoryCountryInfo::new())).unwrap();
    assert!(be.policies().unwrap().is_empty());
}

#[test]
fn spine_records_without_an_id_are_rejected() {
    let fx = fixture();
    let info = MemoryCountryInfo::new();
    info.insert_record(
        euromod::InfoKind::Policy,
        Record::new().with("Name", "nameless_sl").with("Order", "1"),
    )
    .unwrap();
    fx.backend.add_country("BE", Arc::new(info)).unwrap();

    let err = fx.model.country("BE").unwrap().policies().unwrap_err();
    assert!(matches!(
        err,
        EuromodError::Project(ProjectError::MissingRecordField { ref kind, ref field })
            if kind == "POL" && field == "ID"
    ));
}
