// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::graph::{NodeKind, SocketKind};

/// Errors found while validating a graph snapshot.
///
/// Any error makes the snapshot invalid for execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A directed cycle in the connection-induced graph. The back-edge target
    /// appears both first and last in `node_ids`, reflecting closure.
    Cycle { node_ids: Vec<String> },
    /// A connection joins two slots whose socket kinds cannot carry the same
    /// value.
    IncompatibleSocket {
        connection_id: String,
        from: SocketKind,
        to: SocketKind,
    },
    /// A connection endpoint names a node that does not exist in the
    /// snapshot. Distinct from a cycle; the executor tolerates these by
    /// skipping what it cannot resolve.
    DanglingEdge {
        connection_id: String,
        missing_node: String,
    },
}

impl ValidationError {
    /// Stable machine-readable kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Cycle { .. } => "cycle",
            ValidationError::IncompatibleSocket { .. } => "incompatible_socket",
            ValidationError::DanglingEdge { .. } => "dangling_edge",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Cycle { node_ids } => {
                write!(f, "Cycle detected: {}", node_ids.join(" → "))
            }
            ValidationError::IncompatibleSocket { from, to, .. } => {
                write!(f, "Incompatible socket types: {} → {}", from, to)
            }
            ValidationError::DanglingEdge {
                connection_id,
                missing_node,
            } => {
                write!(
                    f,
                    "Connection '{}' references missing node '{}'",
                    connection_id, missing_node
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Non-fatal findings; these never make a snapshot invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A node with no connection touching it (Input nodes are exempt).
    DisconnectedNode { node_id: String, kind: NodeKind },
    /// A declared input slot with no incoming connection and a socket kind
    /// other than `Any`.
    UnconnectedInput { node_id: String, slot: String },
}

impl ValidationWarning {
    /// Stable machine-readable kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationWarning::DisconnectedNode { .. } => "disconnected_node",
            ValidationWarning::UnconnectedInput { .. } => "unconnected_input",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::DisconnectedNode { node_id, kind } => {
                write!(f, "Node \"{}\" ({}) is not connected", node_id, kind)
            }
            ValidationWarning::UnconnectedInput { node_id, slot } => {
                write!(f, "Node \"{}\" input \"{}\" is not connected", node_id, slot)
            }
        }
    }
}
