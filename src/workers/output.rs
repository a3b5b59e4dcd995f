// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline sink: records whatever value reaches it.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::workers::{truncate, Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(5);

pub struct OutputWorker;

#[async_trait]
impl Worker for OutputWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        // Sinks read the first arriving value even under fan-in.
        let value = ctx
            .first_input("value")
            .cloned()
            .unwrap_or(Value::String(String::new()));

        let rendered = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let message = format!("Output: {}", truncate(&rendered, 100));

        let mut outputs = HashMap::new();
        outputs.insert("value".to_string(), value);

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "output"
    }
}
