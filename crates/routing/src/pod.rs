//! Per-pod node descriptor
//!
//! `TargetPod` is the record stored in a routing table slot: the pod's
//! network address, its ordered downstream edges, and the fan-in counter the
//! dispatch layer reads to know how many partial inputs to await.

use flowmesh_protocol::PodRepr;

/// Descriptor of a single pod in the forwarding topology
///
/// A `TargetPod` has no identity of its own; it lives in a slot of the
/// owning `RoutingTable`, keyed by pod name. Read accessors on the table
/// return owned clones, mutation goes through table operations.
///
/// # Example
///
/// ```
/// use flowmesh_routing::TargetPod;
///
/// let mut pod = TargetPod::default();
/// pod.set_address("10.0.0.1", 5000);
/// assert_eq!(pod.full_address(), "10.0.0.1:5000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetPod {
    host: String,
    port: u16,
    out_edges: Vec<String>,
    expected_parts: u32,
}

impl TargetPod {
    /// Assign the network address; no validation of host or port
    #[inline]
    pub fn set_address(&mut self, host: impl Into<String>, port: u16) {
        self.host = host.into();
        self.port = port;
    }

    /// Network host of this pod
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Network port of this pod
    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Full `host:port` address, computed on demand
    #[inline]
    #[must_use]
    pub fn full_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Downstream pod names in registration order, duplicates included
    #[inline]
    pub fn out_edges(&self) -> &[String] {
        &self.out_edges
    }

    /// Append a downstream edge; no de-duplication, no existence check on
    /// the target name
    #[inline]
    pub fn add_out_edge(&mut self, target: impl Into<String>) {
        self.out_edges.push(target.into());
    }

    /// Number of incoming edges registered for this pod
    #[inline]
    pub fn expected_parts(&self) -> u32 {
        self.expected_parts
    }

    /// Increment the fan-in counter; called by the table when an edge into
    /// this pod is wired
    #[inline]
    pub fn bump_expected_parts(&mut self) {
        self.expected_parts += 1;
    }
}

impl From<PodRepr> for TargetPod {
    fn from(repr: PodRepr) -> Self {
        Self {
            host: repr.host,
            port: repr.port,
            out_edges: repr.out_edges,
            expected_parts: repr.expected_parts,
        }
    }
}

impl From<TargetPod> for PodRepr {
    fn from(pod: TargetPod) -> Self {
        Self {
            host: pod.host,
            port: pod.port,
            out_edges: pod.out_edges,
            expected_parts: pod.expected_parts,
        }
    }
}
