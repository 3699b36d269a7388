// src/graph/model.rs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::types::NodeId;

/// Kind-specific parameters, keyed by the node kind.
///
/// Each variant carries only the fields that kind actually uses, so a crop
/// node cannot accidentally hold resize settings.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeParams {
    /// Root of the graph; its output is the externally supplied image.
    Source,
    /// Free-form text-guided edit.
    Edit { prompt: String },
    Crop(CropRect),
    Resize(ResizeTarget),
    ColorAdjust(ColorDeltas),
    /// Two-input side-by-side comparison; forwards its `B` input downstream.
    Compare,
    /// Terminal pass-through.
    Output,
}

/// Crop rectangle in percentages of the input image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Target pixel dimensions for a resize. At least one of `width`/`height`
/// must be set for the node to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub preserve_aspect_ratio: bool,
}

/// Brightness/contrast/saturation deltas in `[-100, 100]`.
///
/// All-zero deltas make the node a pass-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorDeltas {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
}

impl ColorDeltas {
    pub fn is_noop(&self) -> bool {
        self.brightness == 0 && self.contrast == 0 && self.saturation == 0
    }
}

/// Discriminant of [`NodeParams`], for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Source,
    Edit,
    Crop,
    Resize,
    ColorAdjust,
    Compare,
    Output,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Source => "source",
            NodeKind::Edit => "edit",
            NodeKind::Crop => "crop",
            NodeKind::Resize => "resize",
            NodeKind::ColorAdjust => "color-adjust",
            NodeKind::Compare => "compare",
            NodeKind::Output => "output",
        };
        f.write_str(name)
    }
}

/// One typed unit of work in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub params: NodeParams,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, params: NodeParams) -> Self {
        Self {
            id: id.into(),
            params,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.params {
            NodeParams::Source => NodeKind::Source,
            NodeParams::Edit { .. } => NodeKind::Edit,
            NodeParams::Crop(_) => NodeKind::Crop,
            NodeParams::Resize(_) => NodeKind::Resize,
            NodeParams::ColorAdjust(_) => NodeKind::ColorAdjust,
            NodeParams::Compare => NodeKind::Compare,
            NodeParams::Output => NodeKind::Output,
        }
    }
}

/// Labelled input position on a node.
///
/// Every kind except Compare has a single unnamed slot; Compare has `A`
/// and `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSlot {
    Primary,
    A,
    B,
}

impl fmt::Display for InputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputSlot::Primary => "default",
            InputSlot::A => "A",
            InputSlot::B => "B",
        };
        f.write_str(name)
    }
}

impl FromStr for InputSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(InputSlot::Primary),
            "a" => Ok(InputSlot::A),
            "b" => Ok(InputSlot::B),
            other => Err(format!(
                "invalid slot label: {other} (expected \"A\", \"B\" or \"default\")"
            )),
        }
    }
}

/// Directed edge from one node's output to another node's input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub slot: InputSlot,
}

impl Connection {
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            slot: InputSlot::Primary,
        }
    }

    pub fn with_slot(mut self, slot: InputSlot) -> Self {
        self.slot = slot;
        self
    }
}

/// Immutable-per-run snapshot of the pipeline: nodes plus directed
/// connections. Pure data; scheduling state lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Workflow {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The single source node, if present.
    pub fn source_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind() == NodeKind::Source)
    }
}

/// Adjacency view of a [`Workflow`], built once per run.
///
/// Successor and parent lists preserve connection insertion order, which is
/// what makes execution order deterministic for a fixed workflow.
#[derive(Debug, Clone)]
pub struct PipelineGraph {
    /// Node ids in declared order; used to seed roots deterministically.
    order: Vec<NodeId>,
    successors: HashMap<NodeId, Vec<NodeId>>,
    in_degree: HashMap<NodeId, usize>,
    parents: HashMap<NodeId, Vec<(NodeId, InputSlot)>>,
}

impl PipelineGraph {
    /// Build adjacency, in-degree and parent maps in O(nodes + connections).
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut in_degree: HashMap<NodeId, usize> = HashMap::new();
        let mut parents: HashMap<NodeId, Vec<(NodeId, InputSlot)>> = HashMap::new();
        let mut order = Vec::with_capacity(workflow.nodes.len());

        for node in &workflow.nodes {
            order.push(node.id.clone());
            successors.entry(node.id.clone()).or_default();
            in_degree.entry(node.id.clone()).or_insert(0);
            parents.entry(node.id.clone()).or_default();
        }

        for conn in &workflow.connections {
            successors
                .entry(conn.source.clone())
                .or_default()
                .push(conn.target.clone());
            *in_degree.entry(conn.target.clone()).or_insert(0) += 1;
            parents
                .entry(conn.target.clone())
                .or_default()
                .push((conn.source.clone(), conn.slot));
        }

        Self {
            order,
            successors,
            in_degree,
            parents,
        }
    }

    /// All node ids in declared order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Direct successors of a node, in connection insertion order.
    pub fn successors_of(&self, id: &str) -> &[NodeId] {
        self.successors.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// `(parent id, target slot)` for every connection ending at this node.
    pub fn parents_of(&self, id: &str) -> &[(NodeId, InputSlot)] {
        self.parents.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of incoming connections.
    pub fn in_degree_of(&self, id: &str) -> usize {
        self.in_degree.get(id).copied().unwrap_or(0)
    }

    /// Snapshot of the full in-degree map for a run's mutable bookkeeping.
    pub fn in_degrees(&self) -> HashMap<NodeId, usize> {
        self.in_degree.clone()
    }

    /// Nodes with no incoming connections, in declared order.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(|s| s.as_str())
            .filter(|id| self.in_degree_of(id) == 0)
    }
}
