// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution engine: validation, scheduling, the executor, and run state.

pub mod executor;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod validation;


pub use executor::{AbortHandle, GraphExecutor};
pub use report::{ExecutionResult, LogEntry, LogStatus, NodeError};
pub use scheduler::topological_sort;
pub use state::{NodeRuntimeState, NodeStatus, RunStateStore};
pub use validation::{detect_cycles, validate_graph, ValidationResult};
