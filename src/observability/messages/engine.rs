// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run lifecycle and per-node execution events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A full run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use ragweave::observability::messages::engine::RunStarted;
/// use ragweave::observability::messages::StructuredLog;
///
/// RunStarted { node_count: 5, cache_cleared: true }.log();
/// ```
pub struct RunStarted {
    pub node_count: usize,
    pub cache_cleared: bool,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline run: {} nodes, cache_cleared={}",
            self.node_count, self.cache_cleared
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            cache_cleared = self.cache_cleared,
            "{}", self
        );
    }
}

/// A forward run started from a given node.
pub struct ForwardRunStarted<'a> {
    pub start_node: &'a str,
    pub node_count: usize,
}

impl Display for ForwardRunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting forward run from '{}': {} downstream nodes",
            self.start_node, self.node_count
        )
    }
}

impl StructuredLog for ForwardRunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            start_node = self.start_node,
            node_count = self.node_count,
            "{}", self
        );
    }
}

/// A run finished with every scheduled node executed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub executed: usize,
    pub duration_ms: u64,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run completed: {} nodes in {}ms",
            self.executed, self.duration_ms
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            executed = self.executed,
            duration_ms = self.duration_ms,
            "{}", self
        );
    }
}

/// A run stopped early because a node failed.
///
/// # Log Level
/// `error!` - Execution failure
pub struct RunFailed<'a> {
    pub node_id: &'a str,
    pub message: &'a str,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run failed at '{}': {}",
            self.node_id, self.message
        )
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(node_id = self.node_id, message = self.message, "{}", self);
    }
}

/// A run stopped early on an abort request.
///
/// # Log Level
/// `warn!` - Expected but noteworthy
pub struct RunAborted {
    pub completed: usize,
}

impl Display for RunAborted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run aborted after {} completed nodes",
            self.completed
        )
    }
}

impl StructuredLog for RunAborted {
    fn log(&self) {
        tracing::warn!(completed = self.completed, "{}", self);
    }
}

/// Scheduling was rejected because the graph has a cycle.
///
/// # Log Level
/// `error!` - Execution failure
pub struct CycleRejected;

impl Display for CycleRejected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cannot execute graph with cycles")
    }
}

impl StructuredLog for CycleRejected {
    fn log(&self) {
        tracing::error!("{}", self);
    }
}

/// One node began executing.
///
/// # Log Level
/// `debug!` - Per-node detail
pub struct NodeStarted<'a> {
    pub node_id: &'a str,
    pub kind: &'a str,
}

impl Display for NodeStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' ({}) started", self.node_id, self.kind)
    }
}

impl StructuredLog for NodeStarted<'_> {
    fn log(&self) {
        tracing::debug!(node_id = self.node_id, kind = self.kind, "{}", self);
    }
}

/// One node finished executing.
///
/// # Log Level
/// `debug!` - Per-node detail
pub struct NodeCompleted<'a> {
    pub node_id: &'a str,
    pub kind: &'a str,
    pub duration_ms: u64,
}

impl Display for NodeCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' ({}) completed in {}ms",
            self.node_id, self.kind, self.duration_ms
        )
    }
}

impl StructuredLog for NodeCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            node_id = self.node_id,
            kind = self.kind,
            duration_ms = self.duration_ms,
            "{}", self
        );
    }
}

/// One node failed.
///
/// # Log Level
/// `error!` - Execution failure
pub struct NodeFailed<'a> {
    pub node_id: &'a str,
    pub kind: &'a str,
    pub message: &'a str,
}

impl Display for NodeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' ({}) failed: {}",
            self.node_id, self.kind, self.message
        )
    }
}

impl StructuredLog for NodeFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            kind = self.kind,
            message = self.message,
            "{}", self
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_are_stable() {
        let msg = RunStarted {
            node_count: 3,
            cache_cleared: false,
        };
        assert_eq!(
            msg.to_string(),
            "Starting pipeline run: 3 nodes, cache_cleared=false"
        );

        let msg = RunFailed {
            node_id: "ret",
            message: "boom",
        };
        assert_eq!(msg.to_string(), "Pipeline run failed at 'ret': boom");

        assert_eq!(CycleRejected.to_string(), "Cannot execute graph with cycles");
    }
}
