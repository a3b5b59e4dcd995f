// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Mock vector-store retrieval: deterministic chunks from the query text.
//!
//! The only cacheable built-in. Chunk scores descend from 0.9 in steps of
//! 0.1 so downstream rankers see a stable ordering.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{NodeControls, RetrieverControls};
use crate::workers::{truncate, Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(30);

pub struct RetrieverWorker;

#[async_trait]
impl Worker for RetrieverWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Retriever(c) => c.clone(),
            _ => RetrieverControls::default(),
        };
        let query = ctx.input_text("query");

        let chunks: Vec<Value> = (0..controls.top_k)
            .map(|i| {
                json!({
                    "id": format!("chunk-{}", i),
                    "text": format!(
                        "Retrieved document chunk {} for query: \"{}\". This is mock \
                         content that would normally come from a vector store.",
                        i + 1,
                        query
                    ),
                    "score": 0.9 - (i as f64) * 0.1,
                    "metadata": {
                        "source": format!("doc-{}", i),
                        "page": i + 1,
                    },
                })
            })
            .collect();

        let message = format!(
            "Retrieved {} chunks for query: \"{}\"",
            chunks.len(),
            truncate(&query, 30)
        );

        let mut outputs = HashMap::new();
        outputs.insert("chunks".to_string(), Value::Array(chunks));

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "retriever"
    }

    fn cacheable(&self) -> bool {
        true
    }
}
