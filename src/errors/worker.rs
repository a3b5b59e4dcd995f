// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while dispatching or running a node worker.
///
/// Any of these aborts the current walk (fail-fast); the executor records the
/// message on the failing node's run state and in the run's error list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkerError {
    /// The node's kind has no registered worker.
    #[error("No worker found for node type: {kind}")]
    NotRegistered { kind: String },

    /// The worker itself failed with a human-readable message.
    #[error("{0}")]
    Failed(String),

    /// A control value could not be interpreted (e.g. malformed JSON where
    /// the worker requires valid JSON).
    #[error("Invalid control value: {0}")]
    InvalidControl(String),
}
