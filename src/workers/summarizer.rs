// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Mock LLM summarization over raw text or retrieved chunks.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{NodeControls, SummarizerControls};
use crate::workers::{Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(50);

pub struct SummarizerWorker;

#[async_trait]
impl Worker for SummarizerWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Summarizer(c) => c.clone(),
            _ => SummarizerControls::default(),
        };

        // Chunks win over plain text when both arrive.
        let chunks = ctx.input_array("chunks");
        let content = if chunks.is_empty() {
            ctx.input_text("text")
        } else {
            chunks
                .iter()
                .map(|chunk| match chunk.get("text") {
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => chunk.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let summary = format!(
            "[MOCK SUMMARY] This is a generated summary of the provided content. \
             Original length: {} chars. Summary length: ~{} chars. \
             Key points extracted using {} model.",
            content.len(),
            controls.max_length,
            controls.model
        );
        let message = format!(
            "Generated summary ({} chars) from {} chars",
            summary.len(),
            content.len()
        );

        let mut outputs = HashMap::new();
        outputs.insert("summary".to_string(), Value::String(summary));

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "summarizer"
    }
}
