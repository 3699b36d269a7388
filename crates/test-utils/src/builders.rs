#![allow(dead_code)]

use pixeldag::config::validate_workflow;
use pixeldag::graph::{
    ColorDeltas, Connection, CropRect, InputSlot, Node, NodeParams, ResizeTarget, Workflow,
};

/// Builder for [`Workflow`] to simplify test setup.
///
/// Connections are numbered in insertion order, matching what the loader
/// does for `[[connection]]` entries without an explicit id.
pub struct WorkflowBuilder {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn source(self, id: &str) -> Self {
        self.node(id, NodeParams::Source)
    }

    pub fn edit(self, id: &str, prompt: &str) -> Self {
        self.node(
            id,
            NodeParams::Edit {
                prompt: prompt.to_string(),
            },
        )
    }

    pub fn crop(self, id: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.node(
            id,
            NodeParams::Crop(CropRect {
                x,
                y,
                width,
                height,
            }),
        )
    }

    pub fn resize(
        self,
        id: &str,
        width: Option<u32>,
        height: Option<u32>,
        preserve_aspect_ratio: bool,
    ) -> Self {
        self.node(
            id,
            NodeParams::Resize(ResizeTarget {
                width,
                height,
                preserve_aspect_ratio,
            }),
        )
    }

    pub fn color_adjust(self, id: &str, brightness: i32, contrast: i32, saturation: i32) -> Self {
        self.node(
            id,
            NodeParams::ColorAdjust(ColorDeltas {
                brightness,
                contrast,
                saturation,
            }),
        )
    }

    pub fn compare(self, id: &str) -> Self {
        self.node(id, NodeParams::Compare)
    }

    pub fn output(self, id: &str) -> Self {
        self.node(id, NodeParams::Output)
    }

    pub fn node(mut self, id: &str, params: NodeParams) -> Self {
        self.nodes.push(Node::new(id, params));
        self
    }

    /// Connect `source` to `target`'s unnamed slot.
    pub fn connect(self, source: &str, target: &str) -> Self {
        self.connect_slot(source, target, InputSlot::Primary)
    }

    /// Connect `source` to a named slot on `target`.
    pub fn connect_slot(mut self, source: &str, target: &str, slot: InputSlot) -> Self {
        let id = format!("conn-{}", self.connections.len() + 1);
        self.connections
            .push(Connection::new(id, source, target).with_slot(slot));
        self
    }

    /// Build and validate the workflow; panics on structural errors.
    pub fn build(self) -> Workflow {
        let workflow = self.build_unchecked();
        validate_workflow(&workflow).expect("Failed to build valid workflow from builder");
        workflow
    }

    /// Build without validation, for tests that want invalid graphs.
    pub fn build_unchecked(self) -> Workflow {
        Workflow::new(self.nodes, self.connections)
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
