//! Tests for the binary wire codec
//!
//! Covers round-trips, header validation, truncation at each field, and
//! trailing-byte rejection.

use crate::{wire, PodRepr, ProtocolError, TableRepr, MIN_MESSAGE_SIZE, WIRE_MAGIC, WIRE_VERSION};

fn sample_repr() -> TableRepr {
    let mut repr = TableRepr {
        active_pod: "gateway".into(),
        ..TableRepr::default()
    };
    repr.pods.insert(
        "gateway".into(),
        PodRepr {
            host: "10.0.0.1".into(),
            port: 5000,
            out_edges: vec!["encoder".into(), "indexer".into()],
            expected_parts: 0,
        },
    );
    repr.pods.insert(
        "encoder".into(),
        PodRepr {
            host: "10.0.0.2".into(),
            port: 5001,
            out_edges: vec![],
            expected_parts: 1,
        },
    );
    repr.pods.insert(
        "indexer".into(),
        PodRepr {
            host: "10.0.0.3".into(),
            port: 5002,
            out_edges: vec![],
            expected_parts: 1,
        },
    );
    repr
}

// =============================================================================
// Round-trip tests
// =============================================================================

#[test]
fn test_round_trip() {
    let repr = sample_repr();
    let bytes = wire::encode(&repr).unwrap();
    let decoded = wire::decode(&bytes).unwrap();
    assert_eq!(decoded, repr);
}

#[test]
fn test_round_trip_empty_table() {
    let repr = TableRepr::default();
    let bytes = wire::encode(&repr).unwrap();
    assert_eq!(bytes.len(), MIN_MESSAGE_SIZE);
    assert_eq!(wire::decode(&bytes).unwrap(), repr);
}

#[test]
fn test_round_trip_preserves_pod_order() {
    let repr = sample_repr();
    let bytes = wire::encode(&repr).unwrap();
    let decoded = wire::decode(&bytes).unwrap();

    let names: Vec<&String> = decoded.pods.keys().collect();
    assert_eq!(names, ["gateway", "encoder", "indexer"]);
}

#[test]
fn test_round_trip_preserves_duplicate_edges() {
    let mut repr = TableRepr::default();
    repr.pods.insert(
        "a".into(),
        PodRepr {
            out_edges: vec!["b".into(), "b".into()],
            ..PodRepr::default()
        },
    );

    let decoded = wire::decode(&wire::encode(&repr).unwrap()).unwrap();
    assert_eq!(decoded.pods["a"].out_edges, ["b", "b"]);
}

#[test]
fn test_header_layout() {
    let bytes = wire::encode(&TableRepr::default()).unwrap();
    assert_eq!(&bytes[0..2], &WIRE_MAGIC);
    assert_eq!(bytes[2], WIRE_VERSION);
}

// =============================================================================
// Malformed input tests
// =============================================================================

#[test]
fn test_decode_too_short() {
    let err = wire::decode(b"FM").unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooShort { .. }));
}

#[test]
fn test_decode_bad_magic() {
    let mut bytes = wire::encode(&sample_repr()).unwrap().to_vec();
    bytes[0] = b'X';
    let err = wire::decode(&bytes).unwrap_err();
    assert!(matches!(err, ProtocolError::BadMagic { found, .. } if found == [b'X', b'M']));
}

#[test]
fn test_decode_unsupported_version() {
    let mut bytes = wire::encode(&sample_repr()).unwrap().to_vec();
    bytes[2] = 42;
    let err = wire::decode(&bytes).unwrap_err();
    assert!(matches!(err, ProtocolError::UnsupportedVersion(42)));
}

#[test]
fn test_decode_truncated_body() {
    let bytes = wire::encode(&sample_repr()).unwrap();

    // Every strict prefix past the minimum header must fail cleanly,
    // never panic
    for cut in MIN_MESSAGE_SIZE..bytes.len() {
        let err = wire::decode(&bytes[..cut]).unwrap_err();
        assert!(matches!(err, ProtocolError::MessageTooShort { .. }));
    }
}

#[test]
fn test_decode_trailing_bytes() {
    let mut bytes = wire::encode(&sample_repr()).unwrap().to_vec();
    bytes.push(0);
    let err = wire::decode(&bytes).unwrap_err();
    assert!(matches!(err, ProtocolError::TrailingBytes { remaining: 1 }));
}

#[test]
fn test_decode_invalid_utf8() {
    let mut repr = TableRepr::default();
    repr.active_pod = "ab".into();
    let mut bytes = wire::encode(&repr).unwrap().to_vec();

    // Corrupt the active_pod payload, which starts after magic + version
    // + length prefix
    bytes[5] = 0xFF;
    bytes[6] = 0xFE;
    let err = wire::decode(&bytes).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidUtf8(_)));
}

#[test]
fn test_encode_string_too_long() {
    let repr = TableRepr {
        active_pod: "x".repeat(70_000),
        ..TableRepr::default()
    };
    let err = wire::encode(&repr).unwrap_err();
    assert!(matches!(err, ProtocolError::StringTooLong { len: 70_000, .. }));
}
