//! Routing error types

use flowmesh_protocol::ProtocolError;
use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur while building or querying a routing table
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Construction from an unrecognized or malformed external
    /// representation; wraps the decoder's cause
    #[error("failed to construct routing table from {detail}")]
    BadInput {
        /// Description of the offending input
        detail: String,
        /// Underlying decode failure
        #[source]
        source: ProtocolError,
    },

    /// `add_pod` called with a name that already exists
    #[error("pod '{name}' already exists, pod names must be unique")]
    DuplicatePod {
        /// Name of the duplicate pod
        name: String,
    },

    /// A read path dereferenced a name that is not in the table
    #[error("pod '{name}' is not in the routing table")]
    MissingPod {
        /// Name of the missing pod
        name: String,
    },
}

impl RoutingError {
    /// Create a BadInput error
    #[inline]
    pub fn bad_input(detail: impl Into<String>, source: ProtocolError) -> Self {
        Self::BadInput {
            detail: detail.into(),
            source,
        }
    }

    /// Create a DuplicatePod error
    #[inline]
    pub fn duplicate_pod(name: impl Into<String>) -> Self {
        Self::DuplicatePod { name: name.into() }
    }

    /// Create a MissingPod error
    #[inline]
    pub fn missing_pod(name: impl Into<String>) -> Self {
        Self::MissingPod { name: name.into() }
    }
}
