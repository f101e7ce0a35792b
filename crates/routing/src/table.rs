//! Routing table: pod graph, active-pod cursor, and graph algorithms
//!
//! The table owns the name -> `TargetPod` mapping and the active-pod cursor
//! for one in-flight message. Fan-out produces deep-copy snapshots, one per
//! downstream edge, each with the cursor advanced; those snapshots are what
//! the dispatch layer hands to independent consumers.
//!
//! # Aliasing
//!
//! Storage sits behind `Arc<RwLock<..>>` so the two construction modes are
//! explicit at every call site:
//!
//! - `wrap` - a second handle over the same live storage
//! - `clone_of` - an isolated deep copy, required for fan-out because each
//!   snapshot may leave for a concurrent consumer
//!
//! The core itself is single-threaded and the lock is uncontended; it exists
//! so handles are `Send + Sync` once they cross the dispatch boundary.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use flowmesh_protocol::{Bytes, TableRepr};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{Result, RoutingError, TargetPod};

/// Forwarding topology of the pipeline plus the active-pod cursor
///
/// # Example
///
/// ```
/// use flowmesh_routing::RoutingTable;
///
/// let table = RoutingTable::new();
/// table.add_pod("gateway", "10.0.0.1", 5000).unwrap();
/// table.add_pod("encoder", "10.0.0.2", 5001).unwrap();
/// table.add_pod("indexer", "10.0.0.3", 5002).unwrap();
/// table.add_edge("gateway", "encoder");
/// table.add_edge("gateway", "indexer");
///
/// table.set_active_pod("gateway");
/// let next = table.get_next_targets().unwrap();
/// assert_eq!(next.len(), 2);
/// assert_eq!(next[0].active_pod(), "encoder");
/// assert_eq!(next[1].active_pod(), "indexer");
/// ```
#[derive(Debug)]
pub struct RoutingTable {
    inner: Arc<RwLock<TableState>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TableState {
    /// Pod name -> descriptor, in insertion order. Order is observable: it
    /// fixes the traversal start order of `is_acyclic` and the pod order of
    /// encoded representations.
    pods: IndexMap<String, TargetPod>,

    /// Name of the currently active pod; empty until assigned. May name a
    /// pod that is not (yet) present - validated lazily on dereference.
    active_pod: String,
}

impl TableState {
    /// Slot accessor for write paths: missing names are created empty
    fn get_or_create(&mut self, name: &str) -> &mut TargetPod {
        self.pods.entry(name.to_owned()).or_default()
    }

    /// Slot accessor for read paths: missing names are an error
    fn get(&self, name: &str) -> Result<&TargetPod> {
        self.pods
            .get(name)
            .ok_or_else(|| RoutingError::missing_pod(name))
    }

    /// DFS post-order topological sort over all pod names, reversed
    ///
    /// Names referenced by an edge but never added to the table are
    /// traversed as leaves, matching the get-or-create semantics of the
    /// write paths without mutating the table.
    fn topological_sort(&self) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::with_capacity(self.pods.len());
        let mut order: Vec<String> = Vec::with_capacity(self.pods.len());

        for name in self.pods.keys() {
            if !visited.contains(name.as_str()) {
                visited.insert(name.clone());
                self.visit_post_order(name, &mut visited, &mut order);
            }
        }

        order.reverse();
        order
    }

    /// Post-order DFS from `start` with an explicit work stack; the
    /// recursive formulation would be at the mercy of graph depth
    fn visit_post_order(
        &self,
        start: &str,
        visited: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) {
        let mut work: Vec<(String, usize)> = vec![(start.to_owned(), 0)];

        while let Some((name, next_edge)) = work.last_mut() {
            let target = self
                .pods
                .get(name.as_str())
                .and_then(|pod| pod.out_edges().get(*next_edge))
                .cloned();

            match target {
                Some(target) => {
                    *next_edge += 1;
                    if visited.insert(target.clone()) {
                        work.push((target, 0));
                    }
                }
                None => {
                    // all children emitted, emit the node itself
                    order.push(name.clone());
                    work.pop();
                }
            }
        }
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingTable {
    /// Create an empty routing table
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(TableState::default())),
        }
    }

    /// Create a second handle over `other`'s live storage
    ///
    /// Mutations through either handle are visible through both. Never use
    /// this for fan-out snapshots; see [`RoutingTable::clone_of`].
    #[must_use]
    pub fn wrap(other: &RoutingTable) -> Self {
        Self {
            inner: Arc::clone(&other.inner),
        }
    }

    /// Create an independent deep copy of `other`
    ///
    /// The copy shares nothing with the source: mutating one never affects
    /// the other. This is the construction mode fan-out requires, because
    /// each snapshot may be handed to a concurrent downstream consumer.
    #[must_use]
    pub fn clone_of(other: &RoutingTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(other.inner.read().clone())),
        }
    }

    /// Build a table from a decoded external representation
    #[must_use]
    pub fn from_repr(repr: TableRepr) -> Self {
        let mut state = TableState {
            active_pod: repr.active_pod,
            ..TableState::default()
        };
        for (name, pod) in repr.pods {
            state.pods.insert(name, TargetPod::from(pod));
        }

        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Build a table from the binary wire encoding
    ///
    /// # Errors
    ///
    /// Any decode failure is reported as `BadInput` wrapping the cause.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        TableRepr::from_bytes(buf)
            .map(Self::from_repr)
            .map_err(|e| RoutingError::bad_input(format!("{}-byte binary message", buf.len()), e))
    }

    /// Build a table from the JSON string encoding
    ///
    /// # Errors
    ///
    /// Any decode failure is reported as `BadInput` wrapping the cause.
    pub fn from_json(s: &str) -> Result<Self> {
        TableRepr::from_json(s)
            .map(Self::from_repr)
            .map_err(|e| RoutingError::bad_input("json string", e))
    }

    /// Build a table from a JSON value (dictionary shape)
    ///
    /// # Errors
    ///
    /// Any value that does not match the table schema - a bare number, a
    /// string, an object with unknown keys - is reported as `BadInput`
    /// wrapping the cause.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let detail = format!("json value of type {}", value_kind(&value));
        TableRepr::from_value(value)
            .map(Self::from_repr)
            .map_err(|e| RoutingError::bad_input(detail, e))
    }

    /// Render this table to its external representation
    #[must_use]
    pub fn to_repr(&self) -> TableRepr {
        let state = self.inner.read();
        let mut repr = TableRepr {
            active_pod: state.active_pod.clone(),
            ..TableRepr::default()
        };
        for (name, pod) in &state.pods {
            repr.pods.insert(name.clone(), pod.clone().into());
        }
        repr
    }

    /// Render this table to the binary wire encoding
    ///
    /// # Errors
    ///
    /// Fails only if a name or host exceeds the wire format's field limits.
    pub fn to_bytes(&self) -> flowmesh_protocol::Result<Bytes> {
        self.to_repr().to_bytes()
    }

    /// Render this table as a JSON string
    pub fn to_json(&self) -> flowmesh_protocol::Result<String> {
        self.to_repr().to_json()
    }

    /// Render this table as a JSON value
    pub fn to_value(&self) -> flowmesh_protocol::Result<serde_json::Value> {
        self.to_repr().to_value()
    }

    /// Add a pod vertex to the graph
    ///
    /// # Errors
    ///
    /// `DuplicatePod` if the name is already present. The check precedes any
    /// mutation, so a failed call leaves the table unmodified.
    pub fn add_pod(&self, name: &str, host: impl Into<String>, port: u16) -> Result<()> {
        let mut state = self.inner.write();
        if state.pods.contains_key(name) {
            return Err(RoutingError::duplicate_pod(name));
        }
        state.get_or_create(name).set_address(host, port);
        Ok(())
    }

    /// Add a directed edge to the graph
    ///
    /// Both endpoints are get-or-created, so edges may be wired before their
    /// pods are addressed. Appends `to` to `from`'s out-edges and increments
    /// `to`'s expected-parts counter - the only path that counter changes on.
    pub fn add_edge(&self, from: &str, to: &str) {
        let mut state = self.inner.write();
        state.get_or_create(from).add_out_edge(to);
        state.get_or_create(to).bump_expected_parts();
    }

    /// Name of the currently active pod; empty when unset
    #[must_use]
    pub fn active_pod(&self) -> String {
        self.inner.read().active_pod.clone()
    }

    /// Move the active-pod cursor; no validation that the name exists
    pub fn set_active_pod(&self, name: impl Into<String>) {
        self.inner.write().active_pod = name.into();
    }

    /// Descriptor of the currently active pod
    ///
    /// # Errors
    ///
    /// `MissingPod` if the active name is not a key in the table (lazy
    /// validation - `set_active_pod` accepts anything).
    pub fn active_target_pod(&self) -> Result<TargetPod> {
        let state = self.inner.read();
        state.get(&state.active_pod).cloned()
    }

    /// Descriptor of a pod by name
    ///
    /// # Errors
    ///
    /// `MissingPod` if the name is not a key in the table.
    pub fn pod(&self, name: &str) -> Result<TargetPod> {
        self.inner.read().get(name).cloned()
    }

    /// Whether a pod with this name exists
    #[must_use]
    pub fn contains_pod(&self, name: &str) -> bool {
        self.inner.read().pods.contains_key(name)
    }

    /// All pod names in insertion order
    #[must_use]
    pub fn pod_names(&self) -> Vec<String> {
        self.inner.read().pods.keys().cloned().collect()
    }

    /// Number of pods in the graph
    #[must_use]
    pub fn pod_count(&self) -> usize {
        self.inner.read().pods.len()
    }

    /// Whether the graph has no pods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().pods.is_empty()
    }

    /// Compute the next-hop snapshots for the active pod
    ///
    /// One deep-copy snapshot per out-edge of the active pod, in edge order,
    /// each with the cursor moved to that edge's target. An empty vec means
    /// the active pod has no out-edges: end of pipeline, not an error.
    ///
    /// # Errors
    ///
    /// `MissingPod` if the active name is not a key in the table.
    pub fn get_next_targets(&self) -> Result<Vec<RoutingTable>> {
        let out_edges = {
            let state = self.inner.read();
            state.get(&state.active_pod)?.out_edges().to_vec()
        };

        let mut targets = Vec::with_capacity(out_edges.len());
        for next_pod in out_edges {
            let snapshot = RoutingTable::clone_of(self);
            snapshot.set_active_pod(next_pod);
            targets.push(snapshot);
        }

        tracing::trace!(
            active_pod = %self.active_pod(),
            count = targets.len(),
            "computed next-hop snapshots"
        );
        Ok(targets)
    }

    /// Check the graph for routing cycles
    ///
    /// Computes a DFS post-order topological sort (reversed), indexes each
    /// name by its position, and reports `false` iff some edge A -> B has
    /// A positioned after B.
    ///
    /// This is a consistency check on one DFS ordering, not a three-color
    /// cycle detector: on a cyclic graph it can miss a cycle depending on
    /// which pod the traversal reaches first. Callers relying on a stronger
    /// guarantee must not; the behavior is part of the contract.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        let state = self.inner.read();
        let order = state.topological_sort();

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        for first in &order {
            let Some(pod) = state.pods.get(first.as_str()) else {
                // edge-only name, no out-edges to check
                continue;
            };
            for second in pod.out_edges() {
                if let (Some(&a), Some(&b)) = (
                    position.get(first.as_str()),
                    position.get(second.as_str()),
                ) {
                    if a > b {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl PartialEq for RoutingTable {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        *self.inner.read() == *other.inner.read()
    }
}

impl Eq for RoutingTable {}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
