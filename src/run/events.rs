// src/run/events.rs

//! Discrete per-node completion events.
//!
//! The scheduler publishes these so that a presentation layer can follow a
//! run as it happens without the algorithm knowing anything about rendering.
//! Sends never block; a dropped receiver just means nobody is watching.

use tokio::sync::mpsc::UnboundedSender;

use crate::types::NodeId;

/// Progress notification for a single node during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    NodeStarted { node: NodeId },
    NodeSucceeded { node: NodeId },
    NodeFailed { node: NodeId, message: String },
    /// The node was dequeued but had nothing to do (no connections, no
    /// intrinsic output). It stays in its pending state.
    NodeSkipped { node: NodeId },
}

/// Optional destination for [`RunEvent`]s.
pub type EventSink = Option<UnboundedSender<RunEvent>>;

pub(crate) fn emit(sink: &EventSink, event: RunEvent) {
    if let Some(tx) = sink {
        let _ = tx.send(event);
    }
}
