// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Failures split into three layers:
//! - [`WorkflowError`]: the workflow description itself is malformed; nothing
//!   runs until it is fixed.
//! - [`RunError`]: a run could not start at all. Surfaced once per run,
//!   before any node is scheduled.
//! - [`NodeFailure`]: one node failed during a run. Recorded on that node and
//!   never escalated; unrelated branches keep running.

use thiserror::Error;

use crate::types::NodeId;

/// Structural problems with a workflow's nodes or connections.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("workflow must contain at least one node")]
    NoNodes,

    #[error("workflow has no source node")]
    NoSourceNode,

    #[error("workflow has more than one source node ('{0}' and '{1}')")]
    MultipleSourceNodes(NodeId, NodeId),

    #[error("connection '{connection}' refers to unknown node '{node}'")]
    UnknownNode { connection: String, node: NodeId },

    #[error("connection '{0}' connects node '{1}' to itself")]
    SelfLoop(String, NodeId),

    #[error("node '{node}' receives two connections on slot '{slot}'")]
    DuplicateSlot { node: NodeId, slot: String },

    #[error("compare node '{0}' requires connections labelled 'A' or 'B'")]
    CompareSlotRequired(NodeId),

    #[error("node '{node}' does not accept a connection on slot '{slot}'")]
    UnexpectedSlot { node: NodeId, slot: String },

    #[error("source node '{0}' cannot have incoming connections")]
    SourceHasParents(NodeId),

    #[error("output node '{0}' cannot have outgoing connections")]
    OutputHasSuccessors(NodeId),

    #[error("cycle detected in workflow involving node '{0}'")]
    CycleDetected(NodeId),

    #[error("connection '{connection}' has invalid slot label '{slot}' (expected \"A\", \"B\" or \"default\")")]
    InvalidSlotLabel { connection: String, slot: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Why a run refused to start. Checked before any node is scheduled.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("workflow has no source node")]
    NoSourceNode,

    #[error("the source node has no image loaded; supply one before running")]
    MissingSourceImage,
}

/// Node-local configuration problems detected at resolution time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("edit node has no prompt")]
    EmptyPrompt,

    #[error("crop dimensions must be positive (got width {width}%, height {height}%)")]
    NonPositiveCrop { width: f64, height: f64 },

    #[error("resize node requires at least a width or a height")]
    MissingResizeTarget,

    #[error("compare node requires both its 'A' and 'B' inputs to be connected")]
    MissingCompareInput,
}

/// A required parent output was absent when a node tried to read its inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("parent node '{0}' produced no output")]
    ParentNotProcessed(NodeId),

    #[error("node is connected but its input is missing")]
    MissingInput,
}

/// Errors reported by the transformation gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Request blocked due to {reason}. Please modify your prompt or image.")]
    BlockedByPolicy { reason: String },

    #[error("The model did not return an image. Please try a different prompt.")]
    NoImageReturned,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Terminal failure of a single node during a run.
///
/// The scheduler converts each of these into the node's `Failed` state plus
/// a recorded message; the run itself continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
