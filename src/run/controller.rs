// src/run/controller.rs

use tracing::{debug, info};

use crate::errors::RunError;
use crate::gateway::ImageGateway;
use crate::graph::{RunReport, Scheduler, Workflow};
use crate::run::events::EventSink;
use crate::types::SourceImage;

/// Orchestrates one end-to-end run of a workflow.
///
/// Each run starts from scratch: a fresh report with every node pending, a
/// fresh scheduler, no carried-over outputs. The previous run's report is
/// simply replaced by the new one.
#[derive(Debug, Default)]
pub struct RunController {
    busy: bool,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Run the workflow once.
    ///
    /// Refuses to start when the workflow has no source node or no source
    /// image has been supplied; in-run failures never surface here, they are
    /// recorded per node in the report.
    pub async fn run(
        &mut self,
        workflow: &Workflow,
        source: Option<&SourceImage>,
        gateway: &dyn ImageGateway,
    ) -> Result<RunReport, RunError> {
        self.run_with_events(workflow, source, gateway, None).await
    }

    /// Like [`run`](Self::run), additionally publishing per-node progress
    /// events to the given sink.
    pub async fn run_with_events(
        &mut self,
        workflow: &Workflow,
        source: Option<&SourceImage>,
        gateway: &dyn ImageGateway,
        events: EventSink,
    ) -> Result<RunReport, RunError> {
        let source_node = workflow.source_node().ok_or(RunError::NoSourceNode)?;
        let source = source.ok_or(RunError::MissingSourceImage)?;

        debug!(
            source_node = %source_node.id,
            file_name = source.file_name.as_deref().unwrap_or("<unnamed>"),
            "starting workflow run"
        );

        self.busy = true;
        let scheduler = Scheduler::new(workflow, source);
        let report = scheduler.run(gateway, &events).await;
        // Cleared no matter how many nodes failed.
        self.busy = false;

        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "workflow run complete"
        );

        Ok(report)
    }
}
