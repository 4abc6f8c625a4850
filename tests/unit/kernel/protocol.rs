use super::*;
use serde_json::json;

fn parse(value: serde_json::Value) -> EngineMessage {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_parse_cell_lifecycle_events() {
    let msg = parse(json!({ "instanceId": "n1", "type": "cell-eval-started", "cellId": "c1" }));
    assert_eq!(msg.instance_id, Some(InstanceId::from("n1")));
    assert_eq!(
        msg.event,
        EvalEvent::CellEvalStarted {
            cell_id: CellId::from("c1")
        }
    );

    let msg = parse(json!({ "type": "cell-eval-completed", "cellId": "c1" }));
    assert!(msg.instance_id.is_none());
    assert_eq!(msg.event.tag(), "cell-eval-completed");
}

#[test]
fn test_parse_notebook_completed_and_cap() {
    let msg = parse(json!({ "type": "notebook-eval-completed" }));
    assert_eq!(msg.event, EvalEvent::NotebookEvalCompleted);

    let msg = parse(json!({ "type": "output-capped" }));
    assert_eq!(msg.event, EvalEvent::OutputCapped { limit: None });

    let msg = parse(json!({ "type": "output-capped", "limit": 1000 }));
    assert_eq!(msg.event, EvalEvent::OutputCapped { limit: Some(1000) });
}

#[test]
fn test_parse_display_batch() {
    let msg = parse(json!({
        "type": "receive-display",
        "outputs": [
            { "cellId": "a", "output": { "displayType": "string", "value": "hi" } },
            { "cellId": "b", "output": { "value": [1, 2, 3] } }
        ]
    }));

    let EvalEvent::ReceiveDisplay { outputs } = msg.event else {
        panic!("expected receive-display");
    };
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].cell_id.as_str(), "a");
    assert_eq!(outputs[0].output.display_type.as_deref(), Some("string"));
    assert_eq!(outputs[1].output.value, json!([1, 2, 3]));
}

#[test]
fn test_parse_error_with_and_without_cell() {
    let msg = parse(json!({
        "type": "receive-error",
        "cellId": "c",
        "error": { "msg": "ReferenceError: x is not defined", "location": { "line": 1, "column": 4 } }
    }));
    let EvalEvent::ReceiveError { cell_id, error } = msg.event else {
        panic!("expected receive-error");
    };
    assert_eq!(cell_id, Some(CellId::from("c")));
    assert_eq!(error.location.unwrap().column, 4);

    let msg = parse(json!({ "type": "receive-error", "error": { "msg": "boom" } }));
    assert!(matches!(
        msg.event,
        EvalEvent::ReceiveError { cell_id: None, .. }
    ));
}

#[test]
fn test_unknown_event_tag_rejected() {
    let result = serde_json::from_value::<EngineMessage>(json!({ "type": "reticulate-splines" }));
    assert!(result.is_err());
}

#[test]
fn test_request_encoding() {
    let instance = InstanceId::from("n1");
    let cell = CellId::from("c9");
    let doc = DocumentV3 {
        version: 3,
        language: "javascript".to_string(),
        nodejs: None,
        description: None,
        cells: Vec::new(),
    };

    let value = serde_json::to_value(EvalRequest::EvalToCell {
        instance_id: &instance,
        notebook: &doc,
        cell_id: &cell,
        containing_path: Some(Path::new("/work")),
    })
    .unwrap();

    assert_eq!(
        value,
        json!({
            "request": "eval-to-cell",
            "instanceId": "n1",
            "notebook": { "version": 3, "language": "javascript", "cells": [] },
            "cellId": "c9",
            "containingPath": "/work"
        })
    );

    let value = serde_json::to_value(EvalRequest::StopEvaluation {
        instance_id: &instance,
    })
    .unwrap();
    assert_eq!(value, json!({ "request": "stop-evaluation", "instanceId": "n1" }));
}
