// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::edge::Connection;
use super::node::{Node, NodeKind};

/// An immutable-for-the-duration view of a pipeline graph: the node map plus
/// the connection list.
///
/// Nodes are kept in a `BTreeMap` so iteration order (and with it the
/// scheduler's queue seeding) is deterministic by node id. Connection order is
/// declaration order and drives scheduler tie-breaks and fan-in ordering;
/// callers wanting reproducible runs must supply connections in a stable
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    nodes: BTreeMap<String, Node>,
    connections: Vec<Connection>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node with the same id.
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Convenience: create and insert a node of the given kind.
    pub fn add_node(&mut self, id: impl Into<String>, kind: NodeKind) {
        self.insert_node(Node::new(id, kind));
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Convenience: connect `source`'s output slot to `target`'s input slot,
    /// deriving a connection id from the endpoints.
    pub fn connect(
        &mut self,
        source: impl Into<String>,
        source_output: impl Into<String>,
        target: impl Into<String>,
        target_input: impl Into<String>,
    ) {
        let source = source.into();
        let source_output = source_output.into();
        let target = target.into();
        let target_input = target_input.into();
        let id = format!("{}:{}->{}:{}", source, source_output, target, target_input);
        self.connections
            .push(Connection::new(id, source, source_output, target, target_input));
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.nodes.iter()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections targeting the given node, in declaration order.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.target == node_id)
    }

    /// Connections originating at the given node, in declaration order.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.source == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_iteration_is_ordered_by_id() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("zulu", NodeKind::Output);
        graph.add_node("alpha", NodeKind::Input);
        graph.add_node("mike", NodeKind::Summarizer);

        let ids: Vec<&str> = graph.nodes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn incoming_preserves_declaration_order() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("a", NodeKind::Input);
        graph.add_node("b", NodeKind::Input);
        graph.add_node("sum", NodeKind::Summarizer);
        graph.connect("a", "value", "sum", "text");
        graph.connect("b", "value", "sum", "text");

        let sources: Vec<&str> = graph.incoming("sum").map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["a", "b"]);
    }

    #[test]
    fn inserting_same_id_replaces() {
        let mut graph = GraphSnapshot::new();
        graph.add_node("n", NodeKind::Input);
        graph.add_node("n", NodeKind::Output);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("n").map(|n| n.kind), Some(NodeKind::Output));
    }
}
