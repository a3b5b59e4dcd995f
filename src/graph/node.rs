// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline stage definitions: node kinds, typed slots, and per-kind controls.
//!
//! A node's kind is fixed at construction and determines its slot layout and
//! the shape of its configuration. Controls are modeled as one concrete struct
//! per kind rather than an open string map, with an `Opaque` JSON fallback for
//! shapes this crate does not know about.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::socket::SocketKind;

/// Closed enumeration of pipeline stage kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Input,
    Retriever,
    Ranker,
    Router,
    ToolCall,
    Summarizer,
    Evaluator,
    Guardrail,
    Output,
}

impl NodeKind {
    /// Stable string label used in logs and worker dispatch.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Retriever => "retriever",
            NodeKind::Ranker => "ranker",
            NodeKind::Router => "router",
            NodeKind::ToolCall => "toolCall",
            NodeKind::Summarizer => "summarizer",
            NodeKind::Evaluator => "evaluator",
            NodeKind::Guardrail => "guardrail",
            NodeKind::Output => "output",
        }
    }

    /// All kinds, in palette order.
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Input,
            NodeKind::Retriever,
            NodeKind::Ranker,
            NodeKind::Router,
            NodeKind::ToolCall,
            NodeKind::Summarizer,
            NodeKind::Evaluator,
            NodeKind::Guardrail,
            NodeKind::Output,
        ]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared input slot: name plus socket kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSlot {
    pub name: String,
    pub socket: SocketKind,
}

/// A declared output slot: name plus socket kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSlot {
    pub name: String,
    pub socket: SocketKind,
}

/// Input node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputControls {
    pub value: String,
}

impl Default for InputControls {
    fn default() -> Self {
        Self {
            value: "Hello World".to_string(),
        }
    }
}

/// Retriever node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverControls {
    pub top_k: usize,
    pub filters: String,
    pub embedding_model: String,
}

impl Default for RetrieverControls {
    fn default() -> Self {
        Self {
            top_k: 5,
            filters: "{}".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

/// Ranker node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerControls {
    pub rerank_model: String,
    pub score_threshold: f64,
}

impl Default for RankerControls {
    fn default() -> Self {
        Self {
            rerank_model: "cohere-rerank-v3".to_string(),
            score_threshold: 0.5,
        }
    }
}

/// Router node configuration. `routing_rules` is a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterControls {
    pub routing_rules: String,
}

impl Default for RouterControls {
    fn default() -> Self {
        Self {
            routing_rules: r#"{"default":"summarizer"}"#.to_string(),
        }
    }
}

/// Tool Call node configuration. `parameters` is a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallControls {
    pub tool_name: String,
    pub parameters: String,
}

impl Default for ToolCallControls {
    fn default() -> Self {
        Self {
            tool_name: "search".to_string(),
            parameters: r#"{"query":""}"#.to_string(),
        }
    }
}

/// Summarizer node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerControls {
    pub model: String,
    pub max_length: usize,
}

impl Default for SummarizerControls {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            max_length: 200,
        }
    }
}

/// Evaluator node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorControls {
    pub rubric_name: String,
}

impl Default for EvaluatorControls {
    fn default() -> Self {
        Self {
            rubric_name: "accuracy".to_string(),
        }
    }
}

/// Guardrail node configuration. `policies` is a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailControls {
    pub policies: String,
}

impl Default for GuardrailControls {
    fn default() -> Self {
        Self {
            policies: r#"{"blockPII":true,"blockToxic":true}"#.to_string(),
        }
    }
}

/// Per-kind node configuration, one concrete variant per kind.
///
/// The `Opaque` variant carries configuration for node kinds this crate does
/// not model; built-in workers fall back to their defaults when handed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "config", rename_all = "camelCase")]
pub enum NodeControls {
    Input(InputControls),
    Retriever(RetrieverControls),
    Ranker(RankerControls),
    Router(RouterControls),
    ToolCall(ToolCallControls),
    Summarizer(SummarizerControls),
    Evaluator(EvaluatorControls),
    Guardrail(GuardrailControls),
    Output,
    Opaque(serde_json::Value),
}

impl NodeControls {
    /// Default controls for a node kind, matching the editor's palette
    /// defaults.
    pub fn defaults_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Input => NodeControls::Input(InputControls::default()),
            NodeKind::Retriever => NodeControls::Retriever(RetrieverControls::default()),
            NodeKind::Ranker => NodeControls::Ranker(RankerControls::default()),
            NodeKind::Router => NodeControls::Router(RouterControls::default()),
            NodeKind::ToolCall => NodeControls::ToolCall(ToolCallControls::default()),
            NodeKind::Summarizer => NodeControls::Summarizer(SummarizerControls::default()),
            NodeKind::Evaluator => NodeControls::Evaluator(EvaluatorControls::default()),
            NodeKind::Guardrail => NodeControls::Guardrail(GuardrailControls::default()),
            NodeKind::Output => NodeControls::Output,
        }
    }
}

/// A single pipeline stage with typed slots and kind-specific configuration.
///
/// Identity and kind are immutable once created; controls may be replaced by
/// the embedding editor between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub inputs: Vec<InputSlot>,
    pub outputs: Vec<OutputSlot>,
    pub controls: NodeControls,
}

impl Node {
    /// Create a node of the given kind with its declared slot layout and
    /// default controls.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        let (inputs, outputs) = slots_for(kind);
        Self {
            id: id.into(),
            kind,
            inputs,
            outputs,
            controls: NodeControls::defaults_for(kind),
        }
    }

    /// Create a node with explicit controls.
    pub fn with_controls(id: impl Into<String>, kind: NodeKind, controls: NodeControls) -> Self {
        let mut node = Self::new(id, kind);
        node.controls = controls;
        node
    }

    pub fn input_slot(&self, name: &str) -> Option<&InputSlot> {
        self.inputs.iter().find(|slot| slot.name == name)
    }

    pub fn output_slot(&self, name: &str) -> Option<&OutputSlot> {
        self.outputs.iter().find(|slot| slot.name == name)
    }
}

fn input(name: &str, socket: SocketKind) -> InputSlot {
    InputSlot {
        name: name.to_string(),
        socket,
    }
}

fn output(name: &str, socket: SocketKind) -> OutputSlot {
    OutputSlot {
        name: name.to_string(),
        socket,
    }
}

fn slots_for(kind: NodeKind) -> (Vec<InputSlot>, Vec<OutputSlot>) {
    match kind {
        NodeKind::Input => (vec![], vec![output("value", SocketKind::String)]),
        NodeKind::Retriever => (
            vec![input("query", SocketKind::String)],
            vec![output("chunks", SocketKind::DocumentChunk)],
        ),
        NodeKind::Ranker => (
            vec![input("chunks", SocketKind::DocumentChunk)],
            vec![output("ranked", SocketKind::DocumentChunk)],
        ),
        NodeKind::Router => (
            vec![
                input("query", SocketKind::String),
                input("context", SocketKind::Json),
            ],
            vec![
                output("route", SocketKind::String),
                output("data", SocketKind::Json),
            ],
        ),
        NodeKind::ToolCall => (
            vec![input("request", SocketKind::ToolCall)],
            vec![output("response", SocketKind::Json)],
        ),
        NodeKind::Summarizer => (
            vec![
                input("text", SocketKind::String),
                input("chunks", SocketKind::DocumentChunk),
            ],
            vec![output("summary", SocketKind::String)],
        ),
        NodeKind::Evaluator => (
            vec![
                input("query", SocketKind::String),
                input("answer", SocketKind::String),
            ],
            vec![
                output("score", SocketKind::String),
                output("feedback", SocketKind::Json),
            ],
        ),
        NodeKind::Guardrail => (
            vec![input("answer", SocketKind::String)],
            vec![
                output("result", SocketKind::String),
                output("status", SocketKind::Json),
            ],
        ),
        NodeKind::Output => (vec![input("value", SocketKind::Any)], vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retriever_slot_layout() {
        let node = Node::new("r1", NodeKind::Retriever);
        assert_eq!(node.inputs.len(), 1);
        assert_eq!(node.input_slot("query").map(|s| s.socket), Some(SocketKind::String));
        assert_eq!(
            node.output_slot("chunks").map(|s| s.socket),
            Some(SocketKind::DocumentChunk)
        );
        assert!(node.output_slot("missing").is_none());
    }

    #[test]
    fn output_accepts_any() {
        let node = Node::new("out", NodeKind::Output);
        assert_eq!(node.input_slot("value").map(|s| s.socket), Some(SocketKind::Any));
        assert!(node.outputs.is_empty());
    }

    #[test]
    fn default_controls_match_kind() {
        match Node::new("s1", NodeKind::Summarizer).controls {
            NodeControls::Summarizer(controls) => {
                assert_eq!(controls.model, "gpt-4-turbo");
                assert_eq!(controls.max_length, 200);
            }
            other => panic!("unexpected controls: {:?}", other),
        }
    }

    #[test]
    fn every_kind_has_defaults() {
        for &kind in NodeKind::all() {
            let node = Node::new("n", kind);
            assert_eq!(node.kind, kind);
        }
    }
}
