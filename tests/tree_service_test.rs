//! Tests for TreeService, StateStore and TraceStore against a temp directory.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use rbtrace::application::{ApplicationError, TreeService};
use rbtrace::config::Settings;
use rbtrace::domain::{verify, TraceOp};
use rbtrace::infrastructure::traits::{FileSystem, RealFileSystem};
use rbtrace::infrastructure::ServiceContainer;
use rbtrace::util::testing::{black, nil, red};

fn settings(temp: &TempDir, trace: bool) -> Settings {
    Settings {
        base_dir: temp.path().to_path_buf(),
        trace,
        label: "test".into(),
        ..Settings::default()
    }
}

#[test]
fn given_inserts_across_invocations_when_reloaded_then_tree_continues() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(&temp, false));

    // Act: two separate "invocations"
    let mut first = container.tree_service().unwrap();
    for v in [10, 5] {
        first.insert(v).unwrap();
    }
    first.save().unwrap();

    let mut second = container.tree_service().unwrap();
    let report = second.insert(7).unwrap();
    second.save().unwrap();

    // Assert
    assert_eq!(
        report.tree_state,
        black(7, red(5, nil(), nil()), red(10, nil(), nil()))
    );
    let stored = container.state_store().load().unwrap();
    assert_eq!(stored, report.tree_state);
}

#[test]
fn given_tracing_when_operations_run_then_trace_files_written_per_operation() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(&temp, true));
    let mut service = container.tree_service().unwrap();

    let first = service.insert(10).unwrap();
    service.insert(5).unwrap();
    service.remove(10).unwrap();

    let traces = container.trace_store();
    assert_eq!(
        traces.list().unwrap(),
        vec!["insert_10_1.json", "insert_5_2.json", "remove_10_3.json"]
    );
    assert_eq!(
        first.trace_file.as_deref(),
        Some(temp.path().join("tracing/test/insert_10_1.json").as_path())
    );

    let removal = traces.load("remove_10_3.json").unwrap();
    assert_eq!(removal.label, "test");
    assert_eq!(removal.operation, "remove");
    assert_eq!(removal.value, 10);
    assert_eq!(removal.steps[0].operation, TraceOp::Remove);
    assert_eq!(
        removal.steps.last().map(|s| s.tree.clone()),
        Some(black(5, nil(), nil()))
    );
}

#[test]
fn given_absent_value_when_remove_then_report_failure_without_trace() {
    let temp = TempDir::new().unwrap();
    let mut service = TreeService::new(Arc::new(RealFileSystem), Arc::new(settings(&temp, true)));
    service.insert(1).unwrap();

    let report = service.remove(2).unwrap();

    assert!(!report.success);
    assert_eq!(report.message, "Element not found");
    assert!(report.trace_file.is_none());
    assert_eq!(service.traces().list().unwrap().len(), 1);
}

#[test]
fn given_report_when_serialized_then_matches_response_shape() {
    let temp = TempDir::new().unwrap();
    let mut service = TreeService::new(Arc::new(RealFileSystem), Arc::new(settings(&temp, false)));

    let report = service.insert(3).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["message"], "Element inserted successfully");
    assert_eq!(value["value"], 3);
    assert_eq!(value["tree_state"]["color"], "black");
    assert!(value.get("trace_file").is_none());
}

#[test]
fn given_corrupt_state_file_when_loading_service_then_invalid_document() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp, false);
    RealFileSystem
        .write(&settings.state_path(), r#"{"value": 1, "color": "purple", "left": null, "right": null}"#)
        .unwrap();

    let err = ServiceContainer::new(settings).tree_service().err().unwrap();

    match err {
        ApplicationError::InvalidDocument { source, .. } => assert_eq!(source.field(), "$.color"),
        other => panic!("expected InvalidDocument, got {other}"),
    }
}

#[test]
fn given_many_operations_when_saved_and_loaded_then_invariants_hold() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(&temp, false));
    let mut service = container.tree_service().unwrap();
    for v in 0..50 {
        service.insert(v * 7 % 50).unwrap();
    }
    for v in (0..50).step_by(3) {
        service.remove(v).unwrap();
    }
    service.save().unwrap();

    let reloaded = container.tree_service().unwrap();

    assert!(verify(reloaded.tree()).is_ok());
    assert_eq!(reloaded.tree().len(), 50 - 17);
}

#[test]
fn given_clear_when_saved_then_state_file_holds_null() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(settings(&temp, false));
    let mut service = container.tree_service().unwrap();
    service.insert(1).unwrap();

    let report = service.clear();
    service.save().unwrap();

    assert_eq!(report.message, "Tree cleared successfully");
    let content = std::fs::read_to_string(container.settings.state_path()).unwrap();
    assert_eq!(content.trim(), "null");
}
