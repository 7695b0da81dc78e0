mod common;

use std::sync::Arc;

use euromod::{LoadPhase, PolicyKind, SpineElement};

use common::fixture;

#[test]
fn country_attributes_load_once() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    assert_eq!(fx.backend.translation_count(), 0);

    let first = sl.systems().unwrap();
    let queries = fx.info.query_count();
    let second = sl.systems().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fx.info.query_count(), queries);
    assert_eq!(fx.backend.translation_count(), 1);

    let policies = sl.policies().unwrap();
    let queries = fx.info.query_count();
    assert!(Arc::ptr_eq(&policies, &sl.policies().unwrap()));
    assert_eq!(fx.info.query_count(), queries);
    assert_eq!(fx.backend.translation_count(), 1);
}

#[test]
fn systems_keep_store_order() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let systems = sl.systems().unwrap();

    assert_eq!(systems.keys().collect::<Vec<_>>(), ["SL_1996", "SL_1997"]);
    let s96 = sl.system("SL_1996").unwrap();
    assert_eq!(s96.id, "S96");
    assert_eq!(s96.year, "1996");
    assert_eq!(s96.head_def_inc, "ils_origy");
    assert_eq!(sl.system(-1).unwrap().name, "SL_1997");
    assert!(sl.system("SL_2030").unwrap_err().is_lookup());
}

#[test]
fn policies_sort_by_last_system_with_stable_ties() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let policies = sl.policies().unwrap();

    // P2 and P3 share order 1 in SL_1997; store order breaks the tie.
    assert_eq!(
        policies.keys().collect::<Vec<_>>(),
        ["P2", "P3", "P1", "R1", "P4"]
    );
    let p1 = policies.get("P1").unwrap();
    assert_eq!(p1.order, "3");
    assert_eq!(p1.rank(), 3);
}

#[test]
fn reference_policy_takes_target_name() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let policies = sl.policies().unwrap();
    let r1 = policies.get("R1").unwrap();

    assert!(r1.is_reference());
    assert_eq!(r1.name, "tin_sl");
    assert_eq!(
        r1.kind,
        PolicyKind::Reference {
            ref_pol_id: "P2".to_string()
        }
    );
    assert!(r1.functions().unwrap().is_empty());
}

#[test]
fn functions_and_parameters_sort_by_first_system() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let policies = sl.policies().unwrap();
    let tin = policies.get("P2").unwrap();

    let functions = tin.functions().unwrap();
    assert_eq!(functions.keys().collect::<Vec<_>>(), ["F2", "F1"]);

    let arith = functions.get("F1").unwrap();
    assert!(Arc::ptr_eq(&arith.policy().unwrap(), tin));
    let parameters = arith.parameters().unwrap();
    assert_eq!(parameters.keys().collect::<Vec<_>>(), ["A2", "A3", "A1"]);
    assert_eq!(parameters.get("A3").unwrap().group, "1");
}

#[test]
fn system_views_use_composite_ids_and_omit_missing_records() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let s96 = sl.system("SL_1996").unwrap();
    let s97 = sl.system("SL_1997").unwrap();

    // P4 has no record in SL_1996.
    let pols96 = s96.policies().unwrap();
    assert_eq!(
        pols96.keys().collect::<Vec<_>>(),
        ["S96P2", "S96P3", "S96P1", "S96R1"]
    );
    let tin96 = pols96.get("S96P2").unwrap();
    assert_eq!(tin96.id.system_id(), "S96");
    assert_eq!(tin96.id.base_id(), "P2");
    assert_eq!(tin96.switch, "toggle");
    assert_eq!(tin96.name(), "tin_sl");

    let pols97 = s97.policies().unwrap();
    assert_eq!(pols97.len(), 5);

    // Views share the country's type objects.
    let tin97 = pols97.get("S97P2").unwrap();
    assert!(Arc::ptr_eq(tin96.policy(), tin97.policy()));

    let funs96 = tin96.functions().unwrap();
    assert_eq!(funs96.keys().collect::<Vec<_>>(), ["S96F2", "S96F1"]);
    let funs97 = tin97.functions().unwrap();
    assert_eq!(funs97.keys().collect::<Vec<_>>(), ["S97F1"]);
    assert_eq!(funs97.at(0).unwrap().switch, "off");

    let pars96 = funs96.get("S96F1").unwrap().parameters().unwrap();
    assert_eq!(pars96.keys().collect::<Vec<_>>(), ["S96A2", "S96A3", "S96A1"]);
    assert_eq!(pars96.get("S96A3").unwrap().value, "0.2");
    assert_eq!(pars96.get("S96A3").unwrap().group(), "1");

    let pars97 = funs97.at(0).unwrap().parameters().unwrap();
    assert_eq!(pars97.keys().collect::<Vec<_>>(), ["S97A2"]);
}

#[test]
fn view_fields_are_lazy() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let s96 = sl.system("SL_1996").unwrap();
    let pols = s96.policies().unwrap();

    let queries = fx.info.query_count();
    assert!(Arc::ptr_eq(&pols, &s96.policies().unwrap()));
    assert_eq!(fx.info.query_count(), queries);
}

#[test]
fn datasets_and_best_match() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();

    let datasets = sl.datasets().unwrap();
    assert_eq!(datasets.keys().collect::<Vec<_>>(), ["sl_demo_v4", "sl_1996_a"]);
    assert_eq!(datasets.get("sl_1996_a").unwrap().year_inc, "1996");

    let s96 = sl.system("SL_1996").unwrap();
    let in96 = s96.datasets().unwrap();
    assert_eq!(in96.keys().collect::<Vec<_>>(), ["S96D1", "S96D2"]);

    let best = s96.bestmatch_datasets().unwrap();
    assert_eq!(best.keys().collect::<Vec<_>>(), ["sl_1996_a"]);
    assert!(best.at(0).unwrap().best_match);

    let s97 = sl.system("SL_1997").unwrap();
    assert!(s97.bestmatch_datasets().unwrap().is_empty());
    assert_eq!(s97.datasets().unwrap().len(), 1);
}

#[test]
fn extensions_resolve_local_then_model() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();

    let local = sl.local_extensions().unwrap();
    assert_eq!(local.keys().collect::<Vec<_>>(), ["LE1"]);
    assert!(local.at(0).unwrap().is_local());

    let model_exts = fx.model.extensions().unwrap();
    assert_eq!(model_exts.get("ME1").unwrap().short_name, "TCA");

    // The link to an unknown extension is skipped.
    let policies = sl.policies().unwrap();
    let setdefault = policies.get("P1").unwrap();
    let linked = setdefault.extensions().unwrap();
    assert_eq!(linked.keys().collect::<Vec<_>>(), ["LE1", "ME1"]);
    assert!(Arc::ptr_eq(linked.get("ME1").unwrap(), model_exts.get("ME1").unwrap()));

    let tin = policies.get("P2").unwrap();
    assert!(tin.extensions().unwrap().is_empty());
    let arith = tin.functions().unwrap();
    let arith = arith.get("F1").unwrap();
    assert_eq!(arith.extensions().unwrap().keys().collect::<Vec<_>>(), ["ME1"]);

    // System views delegate to their type object.
    let s96 = sl.system("SL_1996").unwrap();
    let pols = s96.policies().unwrap();
    let view = pols.get("S96P1").unwrap();
    assert!(Arc::ptr_eq(&view.extensions().unwrap(), &linked));
}

#[test]
fn containers_render_rows() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let s96 = sl.system("SL_1996").unwrap();

    let rendered = s96.policies().unwrap().to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("0: tin_sl | toggle | TAX: Personal income tax"));
    assert!(lines[0].ends_with(" ..."));
    assert!(lines[2].contains("(with switch set for BTA_sl, TCA)"));
    assert!(lines[3].contains("Reference Policy: tin_sl"));

    let best = s96.bestmatch_datasets().unwrap().to_string();
    assert!(best.contains("sl_1996_a | best match"));
}

#[test]
fn dropping_the_model_detaches_elements() {
    let fx = fixture();
    let sl = fx.model.country("SL").unwrap();
    let policies = sl.policies().unwrap();
    let tin = Arc::clone(policies.get("P2").unwrap());
    assert!(tin.country().is_ok());

    drop(policies);
    drop(sl);
    let common::Fixture { model, .. } = fx;
    drop(model);

    let err = tin.country().unwrap_err();
    assert!(err.is_project());
}

#[test]
fn load_phase_is_observable() {
    let lazy: euromod::Lazy<u32> = euromod::Lazy::new();
    assert_eq!(lazy.phase(), LoadPhase::NotLoaded);
    let value = lazy.get_or_load::<(), _>("test", || Ok(7)).unwrap();
    assert_eq!(*value, 7);
    assert_eq!(lazy.phase(), LoadPhase::Loaded);
}
