// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for pipeline execution.
//!
//! Message types follow a struct-based pattern with `Display` implementations
//! to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! Each message also implements [`messages::StructuredLog`], attaching its
//! fields to the `tracing` event so log aggregators can filter on them.

pub mod messages;
