// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline graph data model: sockets, nodes, connections, and snapshots.

pub mod edge;
pub mod node;
pub mod snapshot;
pub mod socket;

pub use edge::Connection;
pub use node::{
    EvaluatorControls, GuardrailControls, InputControls, InputSlot, Node, NodeControls, NodeKind,
    OutputSlot, RankerControls, RetrieverControls, RouterControls, SummarizerControls,
    ToolCallControls,
};
pub use snapshot::GraphSnapshot;
pub use socket::{is_socket_compatible, SocketKind};
