//! Flowmesh Protocol - External representations of the routing graph
//!
//! This crate owns every encoding of the forwarding topology that crosses a
//! process boundary:
//! - `TableRepr` / `PodRepr` - serde-friendly repr of the graph, isomorphic
//!   to the wire schema
//! - `wire` - compact length-prefixed binary codec over `bytes`
//! - JSON string and JSON value (dictionary) codecs via `serde_json`
//!
//! # Design Principles
//!
//! - **One schema, three encodings**: binary, string, and dictionary all
//!   round-trip through `TableRepr`, so the routing core only ever converts
//!   to and from one type
//! - **Bounds-checked decoding**: malformed input returns a typed
//!   `ProtocolError`, never panics or reads out of bounds
//! - **No I/O**: this crate encodes and decodes buffers; transport belongs
//!   to the caller

mod error;
mod repr;
pub mod wire;

pub use error::ProtocolError;
pub use repr::{PodRepr, TableRepr};

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Magic bytes prefixing every binary-encoded table
pub const WIRE_MAGIC: [u8; 2] = *b"FM";

/// Current binary wire format version
pub const WIRE_VERSION: u8 = 1;

/// Smallest possible binary message: magic + version + empty active pod
/// + zero pod count
pub const MIN_MESSAGE_SIZE: usize = 9;

/// Maximum encoded length of a single string field (u16 length prefix)
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Maximum number of out-edges per pod (u16 count prefix)
pub const MAX_OUT_EDGES: usize = u16::MAX as usize;

// Test modules - only compiled during testing
#[cfg(test)]
mod repr_test;
#[cfg(test)]
mod wire_test;
