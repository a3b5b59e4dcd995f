// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph validation findings.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Validation rejected the graph.
///
/// # Log Level
/// `error!` - The graph cannot run as-is
pub struct GraphValidationFailed {
    pub error_count: usize,
    pub warning_count: usize,
}

impl Display for GraphValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph validation failed: {} errors, {} warnings",
            self.error_count, self.warning_count
        )
    }
}

impl StructuredLog for GraphValidationFailed {
    fn log(&self) {
        tracing::error!(
            error_count = self.error_count,
            warning_count = self.warning_count,
            "{}", self
        );
    }
}

/// A non-fatal validation finding.
///
/// # Log Level
/// `warn!` - The graph runs, but probably not as intended
pub struct ValidationWarningFound<'a> {
    pub kind: &'a str,
    pub detail: &'a str,
}

impl Display for ValidationWarningFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validation warning ({}): {}", self.kind, self.detail)
    }
}

impl StructuredLog for ValidationWarningFound<'_> {
    fn log(&self) {
        tracing::warn!(kind = self.kind, detail = self.detail, "{}", self);
    }
}
