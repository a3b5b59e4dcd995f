// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag attached to every input and output slot.
///
/// Compatibility between sockets is checked at validation time by label only;
/// value coercion (e.g. string ↔ json) is the consuming worker's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SocketKind {
    Number,
    String,
    Json,
    Embedding,
    DocumentChunk,
    ToolCall,
    Any,
}

impl SocketKind {
    /// Stable string label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketKind::Number => "number",
            SocketKind::String => "string",
            SocketKind::Json => "json",
            SocketKind::Embedding => "embedding",
            SocketKind::DocumentChunk => "documentChunk",
            SocketKind::ToolCall => "toolCall",
            SocketKind::Any => "any",
        }
    }
}

impl fmt::Display for SocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns whether a value produced on `from` may flow into `to`.
///
/// `Any` connects to everything, identical kinds connect, and string/json
/// connect in both directions (parsed or stringified at consumption time).
/// All other pairs are incompatible.
pub fn is_socket_compatible(from: SocketKind, to: SocketKind) -> bool {
    if from == SocketKind::Any || to == SocketKind::Any {
        return true;
    }

    if from == to {
        return true;
    }

    matches!(
        (from, to),
        (SocketKind::String, SocketKind::Json) | (SocketKind::Json, SocketKind::String)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SocketKind; 7] = [
        SocketKind::Number,
        SocketKind::String,
        SocketKind::Json,
        SocketKind::Embedding,
        SocketKind::DocumentChunk,
        SocketKind::ToolCall,
        SocketKind::Any,
    ];

    #[test]
    fn any_connects_to_everything() {
        for kind in ALL {
            assert!(is_socket_compatible(SocketKind::Any, kind));
            assert!(is_socket_compatible(kind, SocketKind::Any));
        }
    }

    #[test]
    fn identical_kinds_connect() {
        for kind in ALL {
            assert!(is_socket_compatible(kind, kind));
        }
    }

    #[test]
    fn string_and_json_connect_both_ways() {
        assert!(is_socket_compatible(SocketKind::String, SocketKind::Json));
        assert!(is_socket_compatible(SocketKind::Json, SocketKind::String));
    }

    #[test]
    fn other_pairs_are_incompatible() {
        assert!(!is_socket_compatible(
            SocketKind::Number,
            SocketKind::DocumentChunk
        ));
        assert!(!is_socket_compatible(SocketKind::String, SocketKind::Number));
        assert!(!is_socket_compatible(
            SocketKind::Embedding,
            SocketKind::ToolCall
        ));
        assert!(!is_socket_compatible(
            SocketKind::DocumentChunk,
            SocketKind::Json
        ));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(SocketKind::DocumentChunk.as_str(), "documentChunk");
        assert_eq!(SocketKind::ToolCall.to_string(), "toolCall");
    }
}
