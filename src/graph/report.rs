// src/graph/report.rs

//! Per-run results, as observed by whoever renders them.

use std::collections::BTreeMap;

use crate::types::{ImageData, NodeId};

/// Observable state of a node during/after a run.
///
/// Nodes starved by an upstream failure stay `Pending` for the whole run;
/// they were never attempted and carry no error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// The two inputs a compare node captured for side-by-side display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePair {
    pub a: ImageData,
    pub b: ImageData,
}

/// Everything a renderer needs to know about one node after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub status: NodeStatus,
    /// The image this node contributed downstream, if it produced one.
    pub output: Option<ImageData>,
    pub error: Option<String>,
    /// Captured inputs, compare nodes only.
    pub compare: Option<ComparePair>,
}

impl NodeRecord {
    fn pending() -> Self {
        Self {
            status: NodeStatus::Pending,
            output: None,
            error: None,
            compare: None,
        }
    }
}

/// Complete result of one run, keyed by node id.
///
/// A fresh report is created at run start with every node `Pending`; the
/// scheduler is its only writer, and no report outlives its run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    records: BTreeMap<NodeId, NodeRecord>,
}

impl RunReport {
    /// Reset state: every listed node starts `Pending` with no output,
    /// no error and no captured images.
    pub fn pending_for<'a>(node_ids: impl Iterator<Item = &'a str>) -> Self {
        let records = node_ids
            .map(|id| (id.to_string(), NodeRecord::pending()))
            .collect();
        Self { records }
    }

    pub fn record(&self, id: &str) -> Option<&NodeRecord> {
        self.records.get(id)
    }

    pub fn status_of(&self, id: &str) -> Option<NodeStatus> {
        self.records.get(id).map(|r| r.status)
    }

    pub fn output_of(&self, id: &str) -> Option<&ImageData> {
        self.records.get(id).and_then(|r| r.output.as_ref())
    }

    pub fn error_of(&self, id: &str) -> Option<&str> {
        self.records.get(id).and_then(|r| r.error.as_deref())
    }

    pub fn compare_of(&self, id: &str) -> Option<&ComparePair> {
        self.records.get(id).and_then(|r| r.compare.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRecord)> {
        self.records.iter().map(|(id, rec)| (id.as_str(), rec))
    }

    pub fn succeeded_count(&self) -> usize {
        self.count(NodeStatus::Succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.count(NodeStatus::Failed)
    }

    fn count(&self, status: NodeStatus) -> usize {
        self.records.values().filter(|r| r.status == status).count()
    }

    pub(crate) fn set_running(&mut self, id: &str) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.status = NodeStatus::Running;
        }
    }

    pub(crate) fn set_succeeded(&mut self, id: &str, output: ImageData) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.status = NodeStatus::Succeeded;
            rec.output = Some(output);
        }
    }

    pub(crate) fn set_failed(&mut self, id: &str, message: String) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.status = NodeStatus::Failed;
            rec.error = Some(message);
        }
    }

    /// A node that was dequeued but had nothing to do reverts to `Pending`,
    /// indistinguishable from never having been attempted.
    pub(crate) fn set_skipped(&mut self, id: &str) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.status = NodeStatus::Pending;
        }
    }

    pub(crate) fn set_compare(&mut self, id: &str, pair: ComparePair) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.compare = Some(pair);
        }
    }
}
