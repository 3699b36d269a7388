// src/graph/scheduler.rs

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use crate::errors::{DependencyError, NodeFailure};
use crate::gateway::ImageGateway;
use crate::graph::model::{Node, NodeKind, PipelineGraph, Workflow};
use crate::graph::report::{ComparePair, RunReport};
use crate::resolve::{resolve, Resolution, SlotInputs};
use crate::run::events::{emit, EventSink, RunEvent};
use crate::types::{ImageData, NodeId, SourceImage};

/// Result of processing one node, before it is written to the report.
enum StepOutcome {
    /// The node produced an output image (and, for compare nodes, captured
    /// its two inputs for display).
    Produced {
        output: ImageData,
        compare: Option<ComparePair>,
    },
    /// The node had nothing to do. Its children are still released.
    Nothing,
}

/// Drives one run of a workflow.
///
/// The scheduler owns all per-run mutable state: the FIFO worklist, the
/// in-degree counters and the table of resolved outputs. Nothing of it
/// survives the run, and it is the only writer of node terminal states.
///
/// Node lifecycle within a run:
/// `Pending -> Ready (in-degree reaches zero) -> Running -> Succeeded | Failed`.
/// A node whose ancestor failed never reaches zero in-degree and is left
/// `Pending` when the queue drains.
pub struct Scheduler<'a> {
    workflow: &'a Workflow,
    graph: PipelineGraph,
    source: &'a SourceImage,
}

impl<'a> Scheduler<'a> {
    /// Snapshot the workflow's adjacency for one run.
    pub fn new(workflow: &'a Workflow, source: &'a SourceImage) -> Self {
        let graph = PipelineGraph::from_workflow(workflow);
        Self {
            workflow,
            graph,
            source,
        }
    }

    /// Execute every reachable node once, in topological FIFO order.
    ///
    /// Failures are contained to the failing node and its exclusive
    /// descendants; every other branch keeps running. The returned report
    /// covers all nodes, including the ones that were never attempted.
    pub async fn run(&self, gateway: &dyn ImageGateway, events: &EventSink) -> RunReport {
        let mut report = RunReport::pending_for(self.graph.node_ids());
        let mut outputs: HashMap<NodeId, ImageData> = HashMap::new();
        let mut in_degree = self.graph.in_degrees();
        let mut queue: VecDeque<NodeId> = self.graph.roots().map(str::to_string).collect();

        info!(
            nodes = self.workflow.nodes.len(),
            connections = self.workflow.connections.len(),
            roots = queue.len(),
            "starting pipeline run"
        );

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.workflow.node(&id) else {
                // Connections are validated against the node set, so this
                // only happens with a hand-built inconsistent workflow.
                warn!(node = %id, "queued node missing from workflow; ignoring");
                continue;
            };

            report.set_running(&id);
            emit(events, RunEvent::NodeStarted { node: id.clone() });

            match self.process(node, &outputs, gateway).await {
                Ok(StepOutcome::Produced { output, compare }) => {
                    debug!(node = %id, kind = %node.kind(), "node succeeded");
                    if let Some(pair) = compare {
                        report.set_compare(&id, pair);
                    }
                    outputs.insert(id.clone(), output.clone());
                    report.set_succeeded(&id, output);
                    emit(events, RunEvent::NodeSucceeded { node: id.clone() });
                    self.release_children(&id, &mut in_degree, &mut queue);
                }
                Ok(StepOutcome::Nothing) => {
                    debug!(node = %id, "node has nothing to do; leaving it pending");
                    report.set_skipped(&id);
                    emit(events, RunEvent::NodeSkipped { node: id.clone() });
                    // Not a failure: children still run, and report the
                    // missing output themselves if they depend on it.
                    self.release_children(&id, &mut in_degree, &mut queue);
                }
                Err(failure) => {
                    let message = failure.to_string();
                    warn!(node = %id, error = %message, "node failed");
                    report.set_failed(&id, message.clone());
                    emit(
                        events,
                        RunEvent::NodeFailed {
                            node: id.clone(),
                            message,
                        },
                    );
                    // Children are deliberately not released: every node
                    // reachable only through this one stays Pending until
                    // the run ends.
                }
            }
        }

        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "pipeline run finished"
        );
        report
    }

    /// Process a single dequeued node.
    ///
    /// The gateway call is the only await point; all bookkeeping around it
    /// is synchronous.
    async fn process(
        &self,
        node: &Node,
        outputs: &HashMap<NodeId, ImageData>,
        gateway: &dyn ImageGateway,
    ) -> Result<StepOutcome, NodeFailure> {
        // The source node's output is the externally supplied image, verbatim.
        if node.kind() == NodeKind::Source {
            return Ok(StepOutcome::Produced {
                output: self.source.image.clone(),
                compare: None,
            });
        }

        let inputs = self.gather_inputs(node, outputs)?;

        match resolve(node, &inputs, self.source.mask.as_ref())? {
            Resolution::PassThrough(image) => Ok(StepOutcome::Produced {
                output: image.clone(),
                compare: None,
            }),
            Resolution::Transform(request) => {
                let output = gateway.transform(request).await?;
                Ok(StepOutcome::Produced {
                    output,
                    compare: None,
                })
            }
            Resolution::Compare { a, b } => Ok(StepOutcome::Produced {
                // Downstream consumers see the `B` image.
                output: b.clone(),
                compare: Some(ComparePair {
                    a: a.clone(),
                    b: b.clone(),
                }),
            }),
            Resolution::Skip => Ok(StepOutcome::Nothing),
        }
    }

    /// Collect resolved parent outputs by slot.
    ///
    /// Topological order guarantees parents were dequeued first, so a
    /// missing entry means the parent failed or had nothing to forward.
    fn gather_inputs<'o>(
        &self,
        node: &Node,
        outputs: &'o HashMap<NodeId, ImageData>,
    ) -> Result<SlotInputs<'o>, NodeFailure> {
        let parents = self.graph.parents_of(&node.id);
        let mut inputs = SlotInputs::new(parents.len());

        for (parent, slot) in parents {
            let Some(output) = outputs.get(parent) else {
                return Err(DependencyError::ParentNotProcessed(parent.clone()).into());
            };
            inputs.insert(*slot, output);
        }

        Ok(inputs)
    }

    /// Decrement each direct successor's in-degree, enqueueing the ones that
    /// become ready. Enqueue order follows connection insertion order, which
    /// keeps execution deterministic for a fixed workflow.
    fn release_children(
        &self,
        id: &str,
        in_degree: &mut HashMap<NodeId, usize>,
        queue: &mut VecDeque<NodeId>,
    ) {
        for child in self.graph.successors_of(id) {
            if let Some(remaining) = in_degree.get_mut(child) {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    debug!(node = %child, "all inputs resolved; node is ready");
                    queue.push_back(child.clone());
                }
            }
        }
    }
}
