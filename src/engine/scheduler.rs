// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topological scheduling via Kahn's algorithm.
//!
//! Computes a dependency-respecting execution order from a graph snapshot, or
//! reports that none exists. This is the executor's only cycle backstop; the
//! validator separately enumerates cycles for diagnostics.

use std::collections::{HashMap, VecDeque};

use crate::graph::GraphSnapshot;

/// Compute an execution order over all nodes, or `None` if the graph has a
/// cycle (the only cycle signal this function gives).
///
/// Kahn's algorithm: in-degrees come from the connection list, the FIFO work
/// queue is seeded with zero-in-degree nodes in node-map order (deterministic
/// by node id), and ties among simultaneously-ready nodes resolve FIFO by
/// enqueue order. Enqueue order downstream of the seed follows connection
/// iteration order, so callers wanting run-to-run stable orders must supply
/// connections in a stable order; no secondary sort key is imposed here.
pub fn topological_sort(graph: &GraphSnapshot) -> Option<Vec<String>> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();

    for (id, _) in graph.nodes() {
        in_degree.insert(id, 0);
        adjacency.insert(id, Vec::new());
    }

    for conn in graph.connections() {
        if let Some(neighbors) = adjacency.get_mut(conn.source.as_str()) {
            neighbors.push(&conn.target);
        }
        if let Some(degree) = in_degree.get_mut(conn.target.as_str()) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = graph
        .nodes()
        .map(|(id, _)| id.as_str())
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut sorted = Vec::with_capacity(graph.node_count());

    while let Some(node) = queue.pop_front() {
        sorted.push(node.to_string());

        if let Some(neighbors) = adjacency.get(node) {
            for &neighbor in neighbors {
                if let Some(degree) = in_degree.get_mut(neighbor) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    if sorted.len() == graph.node_count() {
        Some(sorted)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn position(order: &[String], id: &str) -> usize {
        order.iter().position(|n| n == id).unwrap()
    }

    #[test]
    fn linear_chain_orders_by_dependency() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("in", NodeKind::Input);
        graph.add_node("sum", NodeKind::Summarizer);
        graph.add_node("out", NodeKind::Output);
        graph.connect("in", "value", "sum", "text");
        graph.connect("sum", "summary", "out", "value");

        let order = topological_sort(&graph).unwrap();
        assert_eq!(order, vec!["in", "sum", "out"]);
    }

    #[test]
    fn diamond_respects_every_edge() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("in", NodeKind::Input);
        graph.add_node("ret", NodeKind::Retriever);
        graph.add_node("guard", NodeKind::Guardrail);
        graph.add_node("out", NodeKind::Output);
        graph.connect("in", "value", "ret", "query");
        graph.connect("in", "value", "guard", "answer");
        graph.connect("ret", "chunks", "out", "value");
        graph.connect("guard", "result", "out", "value");

        let order = topological_sort(&graph).unwrap();
        assert_eq!(order.len(), 4);
        assert!(position(&order, "in") < position(&order, "ret"));
        assert!(position(&order, "in") < position(&order, "guard"));
        assert!(position(&order, "ret") < position(&order, "out"));
        assert!(position(&order, "guard") < position(&order, "out"));
    }

    #[test]
    fn cycle_yields_none() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("a", NodeKind::Summarizer);
        graph.add_node("b", NodeKind::Summarizer);
        graph.connect("a", "summary", "b", "text");
        graph.connect("b", "summary", "a", "text");

        assert!(topological_sort(&graph).is_none());
    }

    #[test]
    fn partial_cycle_yields_none() {
        // An acyclic prefix does not excuse a cyclic tail.
        let mut graph = GraphSnapshot::new();
        graph.add_node("in", NodeKind::Input);
        graph.add_node("a", NodeKind::Summarizer);
        graph.add_node("b", NodeKind::Summarizer);
        graph.connect("in", "value", "a", "text");
        graph.connect("a", "summary", "b", "text");
        graph.connect("b", "summary", "a", "text");

        assert!(topological_sort(&graph).is_none());
    }

    #[test]
    fn disconnected_nodes_are_scheduled() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("solo", NodeKind::Input);
        graph.add_node("other", NodeKind::Input);

        let order = topological_sort(&graph).unwrap();
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn empty_graph_yields_empty_order() {
        let graph = GraphSnapshot::new();
        assert_eq!(topological_sort(&graph), Some(vec![]));
    }
}
