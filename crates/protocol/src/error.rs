//! Protocol error types
//!
//! Errors that can occur while encoding or decoding a routing graph.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message is too short to contain required fields
    #[error("message too short: expected at least {expected} bytes, got {actual}")]
    MessageTooShort { expected: usize, actual: usize },

    /// Message does not start with the wire magic
    #[error("bad magic: expected {expected:?}, got {found:?}")]
    BadMagic { expected: [u8; 2], found: [u8; 2] },

    /// Wire format version is not supported by this decoder
    #[error("unsupported wire version: {0}")]
    UnsupportedVersion(u8),

    /// A string field is not valid UTF-8
    #[error("invalid utf-8 in string field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Decoder consumed the message but bytes remain
    #[error("trailing bytes after message: {remaining} left over")]
    TrailingBytes { remaining: usize },

    /// A string field exceeds the u16 length prefix
    #[error("string field too long: {len} bytes exceeds maximum {max}")]
    StringTooLong { len: usize, max: usize },

    /// A pod has more out-edges than the u16 count prefix allows
    #[error("too many out-edges: {count} exceeds maximum {max}")]
    TooManyOutEdges { count: usize, max: usize },

    /// JSON string or value did not match the table schema
    #[error("json decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Create a message too short error
    #[inline]
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self::MessageTooShort { expected, actual }
    }

    /// Create a bad magic error
    #[inline]
    pub fn bad_magic(found: [u8; 2]) -> Self {
        Self::BadMagic {
            expected: crate::WIRE_MAGIC,
            found,
        }
    }

    /// Create a string too long error
    #[inline]
    pub fn string_too_long(len: usize) -> Self {
        Self::StringTooLong {
            len,
            max: crate::MAX_STRING_LEN,
        }
    }

    /// Create a too many out-edges error
    #[inline]
    pub fn too_many_out_edges(count: usize) -> Self {
        Self::TooManyOutEdges {
            count,
            max: crate::MAX_OUT_EDGES,
        }
    }
}
