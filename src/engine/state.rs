// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-node runtime state for the lifetime of one run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle status of a node within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Idle,
    Pending,
    Running,
    Success,
    Error,
}

/// Transient status/outputs/error tracked per node for one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRuntimeState {
    pub status: NodeStatus,
    /// Output slot name → value; empty until the node succeeds.
    pub outputs: HashMap<String, serde_json::Value>,
    /// Present iff `status` is [`NodeStatus::Error`].
    pub error: Option<String>,
    /// Millisecond timestamp of the last status transition.
    pub last_run: Option<u64>,
}

impl Default for NodeRuntimeState {
    fn default() -> Self {
        Self {
            status: NodeStatus::Idle,
            outputs: HashMap::new(),
            error: None,
            last_run: None,
        }
    }
}

/// Owns every node's runtime state for one run; discarded between runs.
///
/// The store is owned exclusively by a single executor while a run is in
/// progress; external readers query snapshots between runs.
#[derive(Debug, Default)]
pub struct RunStateStore {
    states: HashMap<String, NodeRuntimeState>,
}

impl RunStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeRuntimeState> {
        self.states.get(node_id)
    }

    /// Mutate a node's state, creating it lazily with `Idle` defaults on
    /// first touch.
    pub fn update(&mut self, node_id: &str, apply: impl FnOnce(&mut NodeRuntimeState)) {
        let state = self.states.entry(node_id.to_string()).or_default();
        apply(state);
    }

    /// The recorded value for one of a node's output slots, if the node has
    /// run and produced it.
    pub fn output_value(&self, node_id: &str, slot: &str) -> Option<&serde_json::Value> {
        self.states.get(node_id).and_then(|s| s.outputs.get(slot))
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_touch_creates_idle_state() {
        let mut store = RunStateStore::new();
        store.update("n1", |_| {});
        let state = store.get("n1").unwrap();
        assert_eq!(state.status, NodeStatus::Idle);
        assert!(state.outputs.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn output_value_requires_recorded_output() {
        let mut store = RunStateStore::new();
        assert!(store.output_value("n1", "value").is_none());

        store.update("n1", |s| {
            s.status = NodeStatus::Success;
            s.outputs.insert("value".to_string(), json!("hello"));
        });
        assert_eq!(store.output_value("n1", "value"), Some(&json!("hello")));
        assert!(store.output_value("n1", "other").is_none());
    }

    #[test]
    fn clear_discards_all_state() {
        let mut store = RunStateStore::new();
        store.update("a", |s| s.status = NodeStatus::Success);
        store.update("b", |s| s.status = NodeStatus::Error);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }
}
