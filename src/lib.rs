// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod engine;  // validation, scheduling, execution
pub mod errors;  // error handling
pub mod graph;   // graph data model
pub mod observability;
pub mod workers; // node workers + registry
