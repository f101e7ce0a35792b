//! Tests for the serde table representation
//!
//! Covers JSON string and JSON value round-trips plus schema rejection of
//! wrong shapes.

use serde_json::json;

use crate::{PodRepr, ProtocolError, TableRepr};

fn sample_repr() -> TableRepr {
    let mut repr = TableRepr {
        active_pod: "a".into(),
        ..TableRepr::default()
    };
    repr.pods.insert(
        "a".into(),
        PodRepr {
            host: "host-a".into(),
            port: 7000,
            out_edges: vec!["b".into()],
            expected_parts: 0,
        },
    );
    repr.pods.insert(
        "b".into(),
        PodRepr {
            host: "host-b".into(),
            port: 7001,
            out_edges: vec![],
            expected_parts: 1,
        },
    );
    repr
}

#[test]
fn test_json_round_trip() {
    let repr = sample_repr();
    let json = repr.to_json().unwrap();
    assert_eq!(TableRepr::from_json(&json).unwrap(), repr);
}

#[test]
fn test_value_round_trip() {
    let repr = sample_repr();
    let value = repr.to_value().unwrap();
    assert_eq!(TableRepr::from_value(value).unwrap(), repr);
}

#[test]
fn test_from_value_object_shape() {
    let value = json!({
        "active_pod": "a",
        "pods": {
            "a": {"host": "h", "port": 1, "out_edges": ["b"], "expected_parts": 0},
            "b": {"host": "h2", "port": 2, "out_edges": [], "expected_parts": 1},
        }
    });

    let repr = TableRepr::from_value(value).unwrap();
    assert_eq!(repr.active_pod, "a");
    assert_eq!(repr.pods["a"].out_edges, ["b"]);
    assert_eq!(repr.pods["b"].expected_parts, 1);
}

#[test]
fn test_missing_fields_default() {
    // Fields absent from the input default, matching the schema's optional
    // fields
    let repr = TableRepr::from_json(r#"{"pods":{"a":{}}}"#).unwrap();
    assert_eq!(repr.active_pod, "");
    assert_eq!(repr.pods["a"].port, 0);
    assert!(repr.pods["a"].out_edges.is_empty());
}

#[test]
fn test_from_value_rejects_number() {
    let err = TableRepr::from_value(json!(5)).unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
}

#[test]
fn test_from_value_rejects_unknown_field() {
    let err = TableRepr::from_value(json!({"active_pod": "a", "bogus": true})).unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
}

#[test]
fn test_from_json_rejects_garbage() {
    assert!(TableRepr::from_json("not json at all").is_err());
}

#[test]
fn test_json_preserves_pod_order() {
    let repr = sample_repr();
    let round_tripped = TableRepr::from_json(&repr.to_json().unwrap()).unwrap();
    let names: Vec<&String> = round_tripped.pods.keys().collect();
    assert_eq!(names, ["a", "b"]);
}
