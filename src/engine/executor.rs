// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequential graph execution over a topological order.
//!
//! The executor runs one node at a time; each node is the unit of suspension
//! and the unit of abort granularity. An abort request takes effect between
//! nodes, so the node in flight always completes and at least one more node
//! may run after the request lands. Aborted runs are not failures.
//!
//! Full runs ([`GraphExecutor::execute_graph`]) reset all prior state.
//! Forward runs ([`GraphExecutor::execute_forward`]) keep prior node states so
//! downstream nodes can read upstream outputs from the previous run, and
//! re-execute only the start node and its transitive downstream.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::report::{now_ms, ExecutionResult, LogEntry, NodeError};
use crate::engine::scheduler::topological_sort;
use crate::engine::state::{NodeRuntimeState, NodeStatus, RunStateStore};
use crate::graph::{GraphSnapshot, Node, NodeKind};
use crate::observability::messages::engine::{
    CycleRejected, ForwardRunStarted, NodeCompleted, NodeFailed, NodeStarted, RunAborted,
    RunCompleted, RunFailed, RunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::workers::{WorkerContext, WorkerRegistry};

/// Cooperative cancellation handle for an executor.
///
/// Cloneable and cheap; handles stay valid across runs because the executor
/// re-arms the shared flag at the start of each run rather than replacing it.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Request that the current run stop after the node in flight.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Drives one graph at a time: schedules, gathers inputs, dispatches workers,
/// and records per-node state and logs.
pub struct GraphExecutor {
    registry: Arc<WorkerRegistry>,
    states: RunStateStore,
    logs: Vec<LogEntry>,
    abort: Arc<AtomicBool>,
}

impl GraphExecutor {
    pub fn new(registry: Arc<WorkerRegistry>) -> Self {
        Self {
            registry,
            states: RunStateStore::new(),
            logs: Vec::new(),
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle other tasks can use to request an abort.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            flag: self.abort.clone(),
        }
    }

    pub fn node_state(&self, node_id: &str) -> Option<&NodeRuntimeState> {
        self.states.get(node_id)
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Discard all run state, logs, and any pending abort request.
    pub fn reset(&mut self) {
        self.states.clear();
        self.logs.clear();
        self.abort.store(false, Ordering::SeqCst);
    }

    /// Execute every node of the graph in dependency order.
    ///
    /// Resets prior state first. `clear_cache` additionally drops memoized
    /// worker results before the run.
    pub async fn execute_graph(
        &mut self,
        graph: &GraphSnapshot,
        clear_cache: bool,
    ) -> ExecutionResult {
        let started = now_ms();
        self.reset();
        if clear_cache {
            self.registry.clear_cache().await;
        }

        let Some(order) = topological_sort(graph) else {
            return self.cycle_failure(started);
        };

        RunStarted {
            node_count: order.len(),
            cache_cleared: clear_cache,
        }
        .log();

        for node_id in &order {
            self.states
                .update(node_id, |s| s.status = NodeStatus::Pending);
        }

        let errors = self.run_order(graph, &order).await;
        let mut outputs = HashMap::new();
        if errors.is_empty() {
            for (id, node) in graph.nodes() {
                if node.kind == NodeKind::Output {
                    if let Some(value) = self.states.output_value(id, "value") {
                        outputs.insert(id.clone(), value.clone());
                    }
                }
            }
        }

        self.finish(started, order.len(), outputs, errors)
    }

    /// Re-execute one node and everything downstream of it, keeping the
    /// previous run's state for all other nodes.
    pub async fn execute_forward(
        &mut self,
        start_id: &str,
        graph: &GraphSnapshot,
    ) -> ExecutionResult {
        let started = now_ms();
        // Prior node states survive so upstream outputs remain readable.
        self.logs.clear();
        self.abort.store(false, Ordering::SeqCst);

        let Some(full_order) = topological_sort(graph) else {
            return self.cycle_failure(started);
        };

        let affected = downstream_of(graph, start_id);
        let order: Vec<String> = full_order
            .into_iter()
            .filter(|id| affected.contains(id.as_str()))
            .collect();

        ForwardRunStarted {
            start_node: start_id,
            node_count: order.len(),
        }
        .log();

        for node_id in &order {
            self.states
                .update(node_id, |s| s.status = NodeStatus::Pending);
        }

        let errors = self.run_order(graph, &order).await;
        // Forward runs never collect terminal outputs.
        self.finish(started, order.len(), HashMap::new(), errors)
    }

    /// Run an ordered slice of node ids, stopping on abort or first failure.
    async fn run_order(&mut self, graph: &GraphSnapshot, order: &[String]) -> Vec<NodeError> {
        let mut errors = Vec::new();
        let mut completed = 0usize;

        for (idx, node_id) in order.iter().enumerate() {
            if self.abort.load(Ordering::SeqCst) {
                RunAborted { completed }.log();
                // Scheduled-but-unrun nodes revert to idle.
                for remaining in &order[idx..] {
                    self.states.update(remaining, |s| {
                        if s.status == NodeStatus::Pending {
                            s.status = NodeStatus::Idle;
                        }
                    });
                }
                break;
            }
            let Some(node) = graph.node(node_id) else {
                continue;
            };
            match self.execute_node(graph, node).await {
                Ok(()) => completed += 1,
                Err(error) => {
                    RunFailed {
                        node_id: &error.node_id,
                        message: &error.message,
                    }
                    .log();
                    errors.push(error);
                    break;
                }
            }
        }

        errors
    }

    async fn execute_node(&mut self, graph: &GraphSnapshot, node: &Node) -> Result<(), NodeError> {
        let kind_label = node.kind.as_str();
        NodeStarted {
            node_id: &node.id,
            kind: kind_label,
        }
        .log();

        let inputs = self.gather_inputs(graph, &node.id);
        self.states.update(&node.id, |s| {
            s.status = NodeStatus::Running;
            s.outputs.clear();
            s.error = None;
            s.last_run = Some(now_ms());
        });

        let ctx = WorkerContext {
            node_id: node.id.clone(),
            kind: node.kind,
            inputs,
            controls: node.controls.clone(),
        };

        match self.registry.dispatch(ctx).await {
            Ok(output) => {
                NodeCompleted {
                    node_id: &node.id,
                    kind: kind_label,
                    duration_ms: output.log.duration,
                }
                .log();
                self.states.update(&node.id, |s| {
                    s.status = NodeStatus::Success;
                    s.outputs = output.outputs.clone();
                });
                self.logs.push(output.log);
                Ok(())
            }
            Err(error) => {
                let message = error.to_string();
                NodeFailed {
                    node_id: &node.id,
                    kind: kind_label,
                    message: &message,
                }
                .log();
                self.logs
                    .push(LogEntry::error(&node.id, node.kind, &message));
                self.states.update(&node.id, |s| {
                    s.status = NodeStatus::Error;
                    s.error = Some(message.clone());
                });
                Err(NodeError {
                    node_id: node.id.clone(),
                    message,
                })
            }
        }
    }

    /// Collect a node's inputs from upstream outputs recorded in the state
    /// store. Fan-in accumulates per slot in connection-declaration order;
    /// connections whose source has not produced the named output contribute
    /// nothing.
    fn gather_inputs(
        &self,
        graph: &GraphSnapshot,
        node_id: &str,
    ) -> BTreeMap<String, Vec<serde_json::Value>> {
        let mut inputs: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();
        for conn in graph.incoming(node_id) {
            if let Some(value) = self.states.output_value(&conn.source, &conn.source_output) {
                inputs
                    .entry(conn.target_input.clone())
                    .or_default()
                    .push(value.clone());
            }
        }
        inputs
    }

    fn cycle_failure(&self, started: u64) -> ExecutionResult {
        CycleRejected.log();
        ExecutionResult {
            success: false,
            duration: now_ms().saturating_sub(started),
            logs: Vec::new(),
            outputs: HashMap::new(),
            errors: vec![NodeError {
                node_id: "graph".to_string(),
                message: CycleRejected.to_string(),
            }],
        }
    }

    fn finish(
        &self,
        started: u64,
        scheduled: usize,
        outputs: HashMap<String, serde_json::Value>,
        errors: Vec<NodeError>,
    ) -> ExecutionResult {
        let duration = now_ms().saturating_sub(started);
        if errors.is_empty() && !self.abort.load(Ordering::SeqCst) {
            RunCompleted {
                executed: scheduled.min(self.logs.len()),
                duration_ms: duration,
            }
            .log();
        }
        ExecutionResult {
            success: errors.is_empty(),
            duration,
            logs: self.logs.clone(),
            outputs,
            errors,
        }
    }
}

/// The start node plus every node reachable from it along connections.
fn downstream_of(graph: &GraphSnapshot, start_id: &str) -> HashSet<String> {
    let mut affected = HashSet::new();
    let mut queue = VecDeque::new();
    affected.insert(start_id.to_string());
    queue.push_back(start_id.to_string());

    while let Some(current) = queue.pop_front() {
        for conn in graph.outgoing(&current) {
            if affected.insert(conn.target.clone()) {
                queue.push_back(conn.target.clone());
            }
        }
    }

    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn chain() -> GraphSnapshot {
        let mut graph = GraphSnapshot::new();
        graph.add_node("in", NodeKind::Input);
        graph.add_node("sum", NodeKind::Summarizer);
        graph.add_node("out", NodeKind::Output);
        graph.connect("in", "value", "sum", "text");
        graph.connect("sum", "summary", "out", "value");
        graph
    }

    #[test]
    fn downstream_includes_start_and_transitive_targets() {
        let graph = chain();
        let affected = downstream_of(&graph, "sum");
        assert!(affected.contains("sum"));
        assert!(affected.contains("out"));
        assert!(!affected.contains("in"));
    }

    #[test]
    fn downstream_of_sink_is_just_the_sink() {
        let graph = chain();
        let affected = downstream_of(&graph, "out");
        assert_eq!(affected.len(), 1);
    }

    #[test]
    fn abort_handle_survives_reset() {
        let mut executor = GraphExecutor::new(Arc::new(WorkerRegistry::builtin()));
        let handle = executor.abort_handle();
        handle.abort();
        assert!(handle.is_aborted());
        executor.reset();
        assert!(!handle.is_aborted());
    }
}
