use std::sync::Arc;

use chart_bridge::BridgeError;
use chart_bridge::adapter::ChartAdapter;
use chart_bridge::core::{ChartConfig, DatasetIndexPolicy, LabeledPoint, SurfaceHandle};
use chart_bridge::library::{HeadlessLedger, HeadlessLibrary};
use serde_json::json;

fn build_config() -> ChartConfig {
    ChartConfig::from_value(json!({
        "type": "line",
        "data": {
            "labels": ["a", "b", "c"],
            "datasets": [{ "label": "first", "data": [1.0, 2.0, 3.0] }]
        }
    }))
    .expect("valid config")
}

fn build_adapter(policy: DatasetIndexPolicy) -> (ChartAdapter, Arc<HeadlessLedger>) {
    let library = HeadlessLibrary::new();
    let ledger = library.ledger();
    let adapter = ChartAdapter::new(
        SurfaceHandle::new("chart-canvas").with_height_px(240.0),
        Arc::new(library),
        build_config(),
        policy,
    )
    .expect("adapter init");
    (adapter, ledger)
}

fn dataset_data(adapter: &ChartAdapter, index: usize) -> serde_json::Value {
    adapter
        .config()
        .expect("live chart")
        .dataset_values(index)
        .expect("dataset present")
        .clone()
        .into()
}

#[test]
fn construction_builds_the_chart_immediately() {
    let (adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    assert!(!adapter.is_disposed());
    assert_eq!(adapter.surface().canvas_id, "chart-canvas");
    assert_eq!(adapter.surface().height_px, Some(240.0));
    assert_eq!(ledger.charts_created(), 1);
    assert_eq!(ledger.updates(), 0);
}

#[test]
fn construction_rejects_an_empty_canvas_id() {
    let library = HeadlessLibrary::new();
    let err = ChartAdapter::new(
        SurfaceHandle::new(""),
        Arc::new(library),
        build_config(),
        DatasetIndexPolicy::AutoCreate,
    )
    .err()
    .expect("empty canvas id must fail");

    assert!(matches!(err, BridgeError::InvalidConfig(_)));
}

#[test]
fn construction_rejects_a_malformed_document() {
    let library = HeadlessLibrary::new();
    let config = ChartConfig::from_value(json!({ "data": { "datasets": {} } }))
        .expect("object root parses");

    let err = ChartAdapter::new(
        SurfaceHandle::new("chart-canvas"),
        Arc::new(library),
        config,
        DatasetIndexPolicy::AutoCreate,
    )
    .err()
    .expect("malformed datasets must fail");

    assert!(matches!(err, BridgeError::InvalidConfig(_)));
}

#[test]
fn change_data_replaces_values_and_labels_then_redraws() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .change_data(
            0,
            vec![json!(7.0), json!(8.0)],
            Some(vec![json!("x"), json!("y")]),
        )
        .expect("change data");

    assert_eq!(dataset_data(&adapter, 0), json!([7.0, 8.0]));
    assert_eq!(ledger.updates(), 1);

    let rendered = ledger.last_rendered().expect("rendered document");
    assert_eq!(rendered["data"]["labels"], json!(["x", "y"]));
    assert_eq!(rendered["data"]["datasets"][0]["data"], json!([7.0, 8.0]));
}

#[test]
fn change_data_without_labels_keeps_the_label_sequence() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .change_data(0, vec![json!(5.0)], None)
        .expect("change data");

    let config = adapter.config().expect("live chart");
    assert_eq!(
        config.labels().expect("labels"),
        &vec![json!("a"), json!("b"), json!("c")]
    );
}

#[test]
fn change_data_raw_writes_point_objects() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .change_data_raw(
            0,
            vec![LabeledPoint::new("jan", 4.5), LabeledPoint::new(2.0, 6.0)],
        )
        .expect("change data raw");

    assert_eq!(
        dataset_data(&adapter, 0),
        json!([{ "x": "jan", "y": 4.5 }, { "x": 2.0, "y": 6.0 }])
    );
}

#[test]
fn push_data_appends_the_label_only_when_supplied() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .push_data(0, json!(4.0), Some(json!("d")))
        .expect("push with label");
    adapter.push_data(0, json!(5.0), None).expect("push bare");

    let config = adapter.config().expect("live chart");
    assert_eq!(dataset_data(&adapter, 0), json!([1.0, 2.0, 3.0, 4.0, 5.0]));
    assert_eq!(
        config.labels().expect("labels"),
        &vec![json!("a"), json!("b"), json!("c"), json!("d")]
    );
}

#[test]
fn push_multiple_data_appends_in_order() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .push_multiple_data(0, vec![json!(4.0), json!(5.0)])
        .expect("push multiple");

    assert_eq!(dataset_data(&adapter, 0), json!([1.0, 2.0, 3.0, 4.0, 5.0]));
    assert_eq!(ledger.updates(), 1);
}

#[test]
fn push_data_and_shift_slides_the_window() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .push_data_and_shift(0, json!(4.0))
        .expect("push and shift");

    assert_eq!(dataset_data(&adapter, 0), json!([2.0, 3.0, 4.0]));
}

#[test]
fn shift_data_returns_the_resulting_dataset_entry() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    let entry = adapter.shift_data(0).expect("shift");

    assert_eq!(entry["label"], json!("first"));
    assert_eq!(entry["data"], json!([2.0, 3.0]));
}

#[test]
fn remove_data_splices_the_requested_range() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);
    adapter
        .change_data(0, (1..=5).map(|i| json!(i as f64)).collect(), None)
        .expect("seed data");

    let entry = adapter.remove_data(0, 1, 2).expect("remove");

    assert_eq!(entry["data"], json!([1.0, 4.0, 5.0]));
}

#[test]
fn options_round_trip_through_the_adapter() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);
    assert_eq!(adapter.get_options().expect("options"), json!({}));

    let options = json!({ "responsive": true, "animation": false });
    adapter
        .change_options(options.clone())
        .expect("change options");

    assert_eq!(adapter.get_options().expect("options"), options);
    assert_eq!(ledger.updates(), 1);
}

#[test]
fn change_options_rejects_non_objects_without_redrawing() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    let err = adapter
        .change_options(json!("bad"))
        .expect_err("string options must fail");

    assert!(matches!(err, BridgeError::InvalidConfig(_)));
    assert_eq!(ledger.updates(), 0);
}

#[test]
fn reject_policy_surfaces_invalid_indices() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::Reject);

    let err = adapter
        .push_data(4, json!(1.0), None)
        .expect_err("missing index must fail");

    assert!(matches!(
        err,
        BridgeError::InvalidDatasetIndex {
            index: 4,
            dataset_count: 1
        }
    ));
    assert_eq!(ledger.updates(), 0);
}

#[test]
fn auto_create_policy_synthesizes_missing_indices() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter
        .push_data(2, json!(9.0), None)
        .expect("push into synthesized dataset");

    assert_eq!(dataset_data(&adapter, 2), json!([9.0]));
    assert_eq!(adapter.config().expect("live chart").dataset_count(), 3);
}

#[test]
fn dispose_is_idempotent_and_makes_operations_fail() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);

    adapter.dispose();
    adapter.dispose();

    assert!(adapter.is_disposed());
    assert_eq!(ledger.charts_destroyed(), 1);

    let err = adapter
        .push_data(0, json!(1.0), None)
        .expect_err("push after dispose must fail");
    assert!(matches!(err, BridgeError::ChartDisposed));

    let err = adapter.get_options().expect_err("options after dispose");
    assert!(matches!(err, BridgeError::ChartDisposed));

    assert_eq!(ledger.updates(), 0);
}

#[test]
fn rebuild_replaces_the_instance_with_a_fresh_config() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);
    let next = ChartConfig::from_value(json!({
        "type": "bar",
        "data": { "datasets": [{ "data": [42.0] }] }
    }))
    .expect("valid config");

    adapter.rebuild(next).expect("rebuild");

    assert_eq!(ledger.charts_created(), 2);
    assert_eq!(ledger.charts_destroyed(), 1);
    let config = adapter.config().expect("live chart");
    assert_eq!(config.chart_type(), Some("bar"));
    assert_eq!(dataset_data(&adapter, 0), json!([42.0]));
}

#[test]
fn rebuild_after_dispose_fails() {
    let (mut adapter, _ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);
    adapter.dispose();

    let err = adapter
        .rebuild(build_config())
        .expect_err("rebuild on disposed chart must fail");

    assert!(matches!(err, BridgeError::ChartDisposed));
    assert!(adapter.is_disposed());
}

#[test]
fn failed_rebuild_leaves_the_adapter_disposed() {
    let (mut adapter, ledger) = build_adapter(DatasetIndexPolicy::AutoCreate);
    let malformed = ChartConfig::from_value(json!({ "data": { "datasets": {} } }))
        .expect("object root parses");

    let err = adapter
        .rebuild(malformed)
        .expect_err("malformed rebuild must fail");

    assert!(matches!(err, BridgeError::InvalidConfig(_)));
    assert!(adapter.is_disposed());
    assert_eq!(ledger.charts_destroyed(), 1);
}
