// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline entry point: emits the configured value verbatim.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{InputControls, NodeControls};
use crate::workers::{truncate, Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(10);

pub struct InputWorker;

#[async_trait]
impl Worker for InputWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Input(c) => c.clone(),
            _ => InputControls::default(),
        };

        let message = format!("Output value: \"{}\"", truncate(&controls.value, 50));
        let mut outputs = HashMap::new();
        outputs.insert("value".to_string(), Value::String(controls.value));

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "input"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn emits_configured_value() {
        let ctx = WorkerContext {
            node_id: "in".to_string(),
            kind: NodeKind::Input,
            inputs: BTreeMap::new(),
            controls: NodeControls::Input(InputControls {
                value: "what is rust".to_string(),
            }),
        };

        let out = InputWorker.run(ctx).await.unwrap();
        assert_eq!(out.outputs["value"], json!("what is rust"));
        assert_eq!(out.log.message, "Output value: \"what is rust\"");
    }

    #[tokio::test]
    async fn falls_back_to_default_on_foreign_controls() {
        let ctx = WorkerContext {
            node_id: "in".to_string(),
            kind: NodeKind::Input,
            inputs: BTreeMap::new(),
            controls: NodeControls::Opaque(json!({"whatever": 1})),
        };

        let out = InputWorker.run(ctx).await.unwrap();
        assert_eq!(out.outputs["value"], json!("Hello World"));
    }
}
