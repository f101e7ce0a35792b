//! Flowmesh Routing - Forwarding topology for the message pipeline
//!
//! Models the directed graph of named processing pods that a message flows
//! through: each pod has a network address, an ordered list of downstream
//! edges, and a fan-in counter the dispatch layer reads. The table tracks
//! which pod is active for an in-flight message and computes the next-hop
//! snapshots handed to the dispatcher on fan-out.
//!
//! # Design
//!
//! - Graph mutation happens once at setup (`add_pod`, `add_edge`); per
//!   message only the active-pod cursor moves
//! - `wrap` vs `clone_of` make aliasing intent explicit at the call site:
//!   fan-out snapshots are always deep copies, safe to hand to independent
//!   downstream consumers
//! - Construction from bytes, JSON strings, and JSON values goes through
//!   `flowmesh_protocol::TableRepr`; every decode failure surfaces as the
//!   single `BadInput` error kind
//!
//! # Example
//!
//! ```
//! use flowmesh_routing::RoutingTable;
//!
//! let table = RoutingTable::new();
//! table.add_pod("gateway", "10.0.0.1", 5000).unwrap();
//! table.add_pod("encoder", "10.0.0.2", 5001).unwrap();
//! table.add_edge("gateway", "encoder");
//! assert!(table.is_acyclic());
//!
//! table.set_active_pod("gateway");
//! let next = table.get_next_targets().unwrap();
//! assert_eq!(next.len(), 1);
//! assert_eq!(next[0].active_pod(), "encoder");
//! ```

mod error;
mod pod;
mod table;


pub use error::{Result, RoutingError};
pub use pod::TargetPod;
pub use table::RoutingTable;

// Re-export the repr type for callers that build tables from decoded input
pub use flowmesh_protocol::TableRepr;
