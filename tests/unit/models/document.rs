use super::*;
use serde_json::json;

#[test]
fn test_v3_document_parses() {
    let doc = SerializedNotebook::from_value(json!({
        "version": 3,
        "language": "typescript",
        "nodejs": "18.0.0",
        "description": "demo",
        "cells": [
            { "id": "a", "cellType": "code", "code": "1", "output": [{ "value": 1 }] },
            { "id": "b", "cellType": "markdown", "markdown": "# b" }
        ]
    }))
    .unwrap();

    assert_eq!(doc.version(), 3);
    let doc = doc.migrate();
    assert_eq!(doc.language, "typescript");
    assert_eq!(doc.nodejs.as_deref(), Some("18.0.0"));
    assert_eq!(doc.description.as_deref(), Some("demo"));
    assert_eq!(doc.cells.len(), 2);
    assert_eq!(doc.cells[1].id().as_str(), "b");
}

#[test]
fn test_v2_sheet_migrates_with_default_language() {
    let doc = SerializedNotebook::from_value(json!({
        "version": 2,
        "nodejs": "8.9.4",
        "sheet": {
            "id": "sheet-1",
            "cells": [{ "id": "c1", "cellType": "code", "code": "x" }]
        }
    }))
    .unwrap();

    assert!(matches!(doc, SerializedNotebook::V2(_)));
    let doc = doc.migrate();
    assert_eq!(doc.version, CURRENT_VERSION);
    assert_eq!(doc.language, DEFAULT_LANGUAGE);
    assert_eq!(doc.nodejs.as_deref(), Some("8.9.4"));
    assert_eq!(doc.cells.len(), 1);
}

#[test]
fn test_v2_sheet_without_cells_is_empty() {
    let doc = SerializedNotebook::from_value(json!({
        "version": 2,
        "sheet": { "id": "s", "language": "typescript" }
    }))
    .unwrap()
    .migrate();

    assert_eq!(doc.language, "typescript");
    assert!(doc.cells.is_empty());
}

#[test]
fn test_missing_and_empty_language_default() {
    let missing = SerializedNotebook::from_value(json!({ "version": 3 }))
        .unwrap()
        .migrate();
    assert_eq!(missing.language, DEFAULT_LANGUAGE);
    assert!(missing.cells.is_empty());

    let empty = SerializedNotebook::from_value(json!({ "version": 3, "language": "", "cells": null }))
        .unwrap()
        .migrate();
    assert_eq!(empty.language, DEFAULT_LANGUAGE);
    assert!(empty.cells.is_empty());
}

#[test]
fn test_version_inferred_from_shape() {
    let v2 = SerializedNotebook::from_value(json!({ "sheet": { "id": "s" } })).unwrap();
    assert!(matches!(v2, SerializedNotebook::V2(_)));

    let v3 = SerializedNotebook::from_value(json!({ "cells": [] })).unwrap();
    assert!(matches!(v3, SerializedNotebook::V3(_)));
}

#[test]
fn test_unknown_version_rejected() {
    let err = SerializedNotebook::from_value(json!({ "version": 7 })).unwrap_err();
    assert!(matches!(err, DocumentError::UnsupportedVersion(7)));

    let err = SerializedNotebook::from_value(json!([1, 2])).unwrap_err();
    assert!(matches!(err, DocumentError::NotAnObject));

    let err = SerializedNotebook::from_json("{ nope").unwrap_err();
    assert!(matches!(err, DocumentError::Json(_)));
}

#[test]
fn test_v3_json_shape() {
    let doc = DocumentV3 {
        version: CURRENT_VERSION,
        language: "javascript".to_string(),
        nodejs: None,
        description: None,
        cells: vec![SerializedCell::Code(SerializedCodeCell {
            id: CellId::from("c"),
            code: "1".to_string(),
            output: Vec::new(),
            errors: Vec::new(),
        })],
    };

    let value: serde_json::Value = serde_json::from_str(&doc.to_json(false).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "version": 3,
            "language": "javascript",
            "cells": [{ "id": "c", "cellType": "code", "code": "1" }]
        })
    );
}
