// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `engine` - run lifecycle and per-node execution events
//! * `validation` - graph validation findings
//!
//! # Usage Pattern
//!
//! ```rust
//! use ragweave::observability::messages::engine::RunStarted;
//! use ragweave::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     node_count: 5,
//!     cache_cleared: false,
//! };
//! msg.log();
//! ```

pub mod engine;
pub mod validation;

/// Emit a message as a `tracing` event with its fields attached.
pub trait StructuredLog {
    fn log(&self);
}
