// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run reporting: per-node log entries and the overall execution result.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::graph::NodeKind;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Final status of one node execution attempt. Transient states (pending,
/// running) are never logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
}

/// One entry per node execution attempt, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub node_id: String,
    pub node_type: NodeKind,
    /// Millisecond timestamps.
    pub start: u64,
    pub end: u64,
    pub duration: u64,
    pub status: LogStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl LogEntry {
    /// A success entry spanning from `start` to now.
    pub fn success(
        node_id: impl Into<String>,
        node_type: NodeKind,
        start: u64,
        message: impl Into<String>,
    ) -> Self {
        let end = now_ms();
        Self {
            node_id: node_id.into(),
            node_type,
            start,
            end,
            duration: end.saturating_sub(start),
            status: LogStatus::Success,
            message: message.into(),
            data: None,
        }
    }

    /// A zero-duration error entry timestamped now.
    pub fn error(
        node_id: impl Into<String>,
        node_type: NodeKind,
        message: impl Into<String>,
    ) -> Self {
        let now = now_ms();
        Self {
            node_id: node_id.into(),
            node_type,
            start: now,
            end: now,
            duration: 0,
            status: LogStatus::Error,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The failing node and message attached to a failed run. The synthetic node
/// id `graph` marks graph-level failures such as cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeError {
    pub node_id: String,
    pub message: String,
}

/// Outcome of one full or forward run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// False iff the run stopped before completion (cycle or node failure).
    /// An aborted run still reports true.
    pub success: bool,
    /// Wall-clock milliseconds from method entry to return.
    pub duration: u64,
    /// All entries produced, in execution order.
    pub logs: Vec<LogEntry>,
    /// Output-kind node id → that node's `value` input. Populated only by
    /// successful full runs; always empty for forward runs.
    pub outputs: HashMap<String, serde_json::Value>,
    /// Empty iff `success`.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<NodeError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_entries_have_zero_duration() {
        let entry = LogEntry::error("n1", NodeKind::Summarizer, "boom");
        assert_eq!(entry.duration, 0);
        assert_eq!(entry.start, entry.end);
        assert_eq!(entry.status, LogStatus::Error);
    }

    #[test]
    fn success_entry_spans_start_to_now() {
        let start = now_ms();
        let entry = LogEntry::success("n1", NodeKind::Input, start, "done");
        assert!(entry.end >= entry.start);
        assert_eq!(entry.duration, entry.end - entry.start);
        assert_eq!(entry.status, LogStatus::Success);
    }
}
