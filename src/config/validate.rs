// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::WorkflowError;
use crate::graph::model::{InputSlot, NodeKind, Workflow};

/// Run structural validation against a workflow.
///
/// This checks:
/// - there is at least one node and exactly one source node
/// - every connection's endpoints exist, with no self-loops
/// - each `(target, slot)` pair receives at most one connection
/// - compare nodes are wired through their `A`/`B` slots, and only they are
/// - source nodes have no parents; output nodes have no successors
/// - the graph has no cycles
///
/// It does **not** validate kind-specific parameters (empty prompts,
/// degenerate crop rectangles); those surface as per-node failures at run
/// time so the rest of the pipeline still executes.
pub fn validate_workflow(workflow: &Workflow) -> Result<(), WorkflowError> {
    ensure_has_nodes(workflow)?;
    validate_source_count(workflow)?;
    validate_connections(workflow)?;
    validate_acyclic(workflow)?;
    Ok(())
}

fn ensure_has_nodes(workflow: &Workflow) -> Result<(), WorkflowError> {
    if workflow.nodes.is_empty() {
        return Err(WorkflowError::NoNodes);
    }
    Ok(())
}

fn validate_source_count(workflow: &Workflow) -> Result<(), WorkflowError> {
    let mut sources = workflow
        .nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Source);

    let first = sources.next().ok_or(WorkflowError::NoSourceNode)?;
    if let Some(second) = sources.next() {
        return Err(WorkflowError::MultipleSourceNodes(
            first.id.clone(),
            second.id.clone(),
        ));
    }
    Ok(())
}

fn validate_connections(workflow: &Workflow) -> Result<(), WorkflowError> {
    let mut taken_slots: HashSet<(&str, InputSlot)> = HashSet::new();

    for conn in &workflow.connections {
        let source = workflow
            .node(&conn.source)
            .ok_or_else(|| WorkflowError::UnknownNode {
                connection: conn.id.clone(),
                node: conn.source.clone(),
            })?;
        let target = workflow
            .node(&conn.target)
            .ok_or_else(|| WorkflowError::UnknownNode {
                connection: conn.id.clone(),
                node: conn.target.clone(),
            })?;

        if conn.source == conn.target {
            return Err(WorkflowError::SelfLoop(conn.id.clone(), conn.source.clone()));
        }

        if !taken_slots.insert((conn.target.as_str(), conn.slot)) {
            return Err(WorkflowError::DuplicateSlot {
                node: conn.target.clone(),
                slot: conn.slot.to_string(),
            });
        }

        match target.kind() {
            NodeKind::Source => {
                return Err(WorkflowError::SourceHasParents(target.id.clone()));
            }
            NodeKind::Compare => {
                if conn.slot == InputSlot::Primary {
                    return Err(WorkflowError::CompareSlotRequired(target.id.clone()));
                }
            }
            _ => {
                if conn.slot != InputSlot::Primary {
                    return Err(WorkflowError::UnexpectedSlot {
                        node: target.id.clone(),
                        slot: conn.slot.to_string(),
                    });
                }
            }
        }

        if source.kind() == NodeKind::Output {
            return Err(WorkflowError::OutputHasSuccessors(source.id.clone()));
        }
    }

    Ok(())
}

fn validate_acyclic(workflow: &Workflow) -> Result<(), WorkflowError> {
    // Edge direction: source -> target. Self-loops were rejected above, so
    // the graph map never sees one.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for node in &workflow.nodes {
        graph.add_node(node.id.as_str());
    }

    for conn in &workflow.connections {
        graph.add_edge(conn.source.as_str(), conn.target.as_str(), ());
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(WorkflowError::CycleDetected(cycle.node_id().to_string())),
    }
}
