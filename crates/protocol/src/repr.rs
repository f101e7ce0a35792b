//! Serde representation of the routing graph
//!
//! `TableRepr` is the single schema behind all three external encodings of a
//! routing table: binary (`wire` module), JSON string, and JSON value
//! (dictionary). The routing crate converts its in-memory state to and from
//! `TableRepr`; everything past that point is this crate's concern.
//!
//! # Schema
//!
//! ```json
//! {
//!   "active_pod": "gateway",
//!   "pods": {
//!     "gateway": {
//!       "host": "10.0.0.1",
//!       "port": 5000,
//!       "out_edges": ["encoder"],
//!       "expected_parts": 0
//!     }
//!   }
//! }
//! ```
//!
//! Pod order in `pods` is significant (it fixes traversal start order on the
//! consuming side), so the map is an `IndexMap` and all encodings preserve
//! insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{wire, Bytes, Result};

/// External representation of a single pod
///
/// Mirrors the node-descriptor fields exactly: address, ordered out-edge
/// list, and the fan-in counter the dispatch layer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PodRepr {
    /// Network host of the pod
    #[serde(default)]
    pub host: String,

    /// Network port of the pod
    #[serde(default)]
    pub port: u16,

    /// Downstream pod names, in registration order (duplicates allowed)
    #[serde(default)]
    pub out_edges: Vec<String>,

    /// Number of incoming edges registered for this pod
    #[serde(default)]
    pub expected_parts: u32,
}

/// External representation of a whole routing table
///
/// # Example
///
/// ```
/// use flowmesh_protocol::TableRepr;
///
/// let json = r#"{"active_pod":"a","pods":{"a":{"host":"h","port":1,"out_edges":[],"expected_parts":0}}}"#;
/// let repr = TableRepr::from_json(json).unwrap();
/// assert_eq!(repr.active_pod, "a");
/// assert_eq!(repr.pods.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableRepr {
    /// Name of the currently active pod; empty when unset
    #[serde(default)]
    pub active_pod: String,

    /// Pod name -> pod record, in insertion order
    #[serde(default)]
    pub pods: IndexMap<String, PodRepr>,
}

impl TableRepr {
    /// Decode a table from the binary wire format
    ///
    /// # Errors
    ///
    /// Returns a `ProtocolError` describing the first malformed field.
    #[inline]
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        wire::decode(buf)
    }

    /// Encode this table into the binary wire format
    ///
    /// # Errors
    ///
    /// Fails only if a string field or out-edge list exceeds the wire
    /// format's u16 prefixes.
    #[inline]
    pub fn to_bytes(&self) -> Result<Bytes> {
        wire::encode(self)
    }

    /// Decode a table from its JSON string encoding
    #[inline]
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Encode this table as a JSON string
    #[inline]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a table from a JSON value (dictionary shape)
    ///
    /// Any value that is not an object matching the schema (a number, a
    /// string, an array, an object with unknown keys) is rejected.
    #[inline]
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encode this table as a JSON value
    #[inline]
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
