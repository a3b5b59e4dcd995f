// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph validation: cycle enumeration, socket compatibility, connectivity.
//!
//! Validation is a pure function over a snapshot; it has no side effects and
//! may be called repeatedly or concurrently. The executor never invokes it:
//! a caller that skips validation and executes a cyclic graph still fails
//! safely through the scheduler's own cycle check.
//!
//! Checks, in order:
//!
//! 1. Cycle enumeration: DFS with a recursion stack. Every component
//!    with an unvisited starting node is searched, so independent cycles are
//!    all reported; a cycle in one component does not suppress another.
//! 2. Socket compatibility: label-level check per connection; no value
//!    coercion is attempted. Connections whose endpoint *slot* is missing are
//!    skipped here (the executor tolerates them by gathering nothing).
//! 3. Dangling edges: connections naming a nonexistent *node* are their
//!    own error class, never a cycle.
//! 4. Connectivity warnings: untouched nodes (Input exempt) and
//!    unconnected non-`Any` input slots.

use std::collections::{HashMap, HashSet};

use crate::errors::{ValidationError, ValidationWarning};
use crate::graph::{is_socket_compatible, GraphSnapshot, NodeKind, SocketKind};

/// Outcome of validating one snapshot. `valid` is true iff `errors` is empty;
/// warnings never affect it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Enumerate simple cycles reachable from unvisited starting nodes.
///
/// Each reported cycle lists the nodes on the cycle in path order, with the
/// back-edge target repeated as the final element.
pub fn detect_cycles(graph: &GraphSnapshot) -> Vec<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (id, _) in graph.nodes() {
        adjacency.insert(id, Vec::new());
    }
    for conn in graph.connections() {
        if let Some(neighbors) = adjacency.get_mut(conn.source.as_str()) {
            neighbors.push(&conn.target);
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut cycles = Vec::new();

    for (id, _) in graph.nodes() {
        if !visited.contains(id.as_str()) {
            let mut rec_stack = HashSet::new();
            let mut path = Vec::new();
            dfs(
                id,
                &adjacency,
                &mut visited,
                &mut rec_stack,
                &mut path,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = adjacency.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                if dfs(neighbor, adjacency, visited, rec_stack, path, cycles) {
                    return true;
                }
            } else if rec_stack.contains(neighbor) {
                // Back edge: close the cycle from the first occurrence of the
                // neighbor on the current path.
                let start = path.iter().position(|&n| n == neighbor).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(neighbor.to_string());
                cycles.push(cycle);
                return true;
            }
        }
    }

    path.pop();
    rec_stack.remove(node);
    false
}

/// Validate a snapshot: cycles and socket mismatches are errors, connectivity
/// findings are warnings.
pub fn validate_graph(graph: &GraphSnapshot) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for cycle in detect_cycles(graph) {
        errors.push(ValidationError::Cycle { node_ids: cycle });
    }

    for conn in graph.connections() {
        let (source_node, target_node) = match (graph.node(&conn.source), graph.node(&conn.target))
        {
            (Some(s), Some(t)) => (s, t),
            (None, _) => {
                errors.push(ValidationError::DanglingEdge {
                    connection_id: conn.id.clone(),
                    missing_node: conn.source.clone(),
                });
                continue;
            }
            (_, None) => {
                errors.push(ValidationError::DanglingEdge {
                    connection_id: conn.id.clone(),
                    missing_node: conn.target.clone(),
                });
                continue;
            }
        };

        let source_slot = source_node.output_slot(&conn.source_output);
        let target_slot = target_node.input_slot(&conn.target_input);

        if let (Some(source_slot), Some(target_slot)) = (source_slot, target_slot) {
            if !is_socket_compatible(source_slot.socket, target_slot.socket) {
                errors.push(ValidationError::IncompatibleSocket {
                    connection_id: conn.id.clone(),
                    from: source_slot.socket,
                    to: target_slot.socket,
                });
            }
        }
    }

    let mut touched: HashSet<&str> = HashSet::new();
    for conn in graph.connections() {
        touched.insert(&conn.source);
        touched.insert(&conn.target);
    }

    for (id, node) in graph.nodes() {
        if node.kind == NodeKind::Input {
            continue;
        }
        if !touched.contains(id.as_str()) {
            warnings.push(ValidationWarning::DisconnectedNode {
                node_id: id.clone(),
                kind: node.kind,
            });
        }
    }

    for (id, node) in graph.nodes() {
        for slot in &node.inputs {
            if slot.socket == SocketKind::Any {
                continue;
            }
            let connected = graph
                .incoming(id)
                .any(|conn| conn.target_input == slot.name);
            if !connected {
                warnings.push(ValidationWarning::UnconnectedInput {
                    node_id: id.clone(),
                    slot: slot.name.clone(),
                });
            }
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
