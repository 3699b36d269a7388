// src/graph/mod.rs

//! Workflow representation and scheduling.
//!
//! - [`model`] holds the pure data: nodes, connections and the adjacency
//!   view built from them.
//! - [`scheduler`] contains the per-run execution loop that walks the graph
//!   in topological order and settles every node's terminal state.
//! - [`report`] is the per-run result consumed by renderers.

pub mod model;
pub mod report;
pub mod scheduler;

pub use model::{
    ColorDeltas, Connection, CropRect, InputSlot, Node, NodeKind, NodeParams, PipelineGraph,
    ResizeTarget, Workflow,
};
pub use report::{ComparePair, NodeRecord, NodeStatus, RunReport};
pub use scheduler::Scheduler;
