// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Mock external tool invocation.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{NodeControls, ToolCallControls};
use crate::workers::{Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(40);

pub struct ToolCallWorker;

#[async_trait]
impl Worker for ToolCallWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::ToolCall(c) => c.clone(),
            _ => ToolCallControls::default(),
        };

        let parameters: Value =
            serde_json::from_str(&controls.parameters).unwrap_or_else(|_| json!({}));

        let response = json!({
            "tool": controls.tool_name,
            "status": "success",
            "result": format!(
                "Mock result from {} tool with parameters: {}",
                controls.tool_name, parameters
            ),
            "execution_time_ms": 200,
        });

        let message = format!("Executed tool: {}", controls.tool_name);

        let mut outputs = HashMap::new();
        outputs.insert("response".to_string(), response);

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "toolCall"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use std::collections::BTreeMap;

    fn ctx(tool_name: &str, parameters: &str) -> WorkerContext {
        WorkerContext {
            node_id: "tool".to_string(),
            kind: NodeKind::ToolCall,
            inputs: BTreeMap::new(),
            controls: NodeControls::ToolCall(ToolCallControls {
                tool_name: tool_name.to_string(),
                parameters: parameters.to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn reports_the_configured_tool() {
        let out = ToolCallWorker
            .run(ctx("search", r#"{"query":"rust"}"#))
            .await
            .unwrap();
        let response = &out.outputs["response"];
        assert_eq!(response["tool"], json!("search"));
        assert_eq!(response["status"], json!("success"));
        assert_eq!(out.log.message, "Executed tool: search");
    }

    #[tokio::test]
    async fn malformed_parameters_degrade_to_empty_object() {
        let out = ToolCallWorker.run(ctx("search", "{{nope")).await.unwrap();
        let result = out.outputs["response"]["result"].as_str().unwrap();
        assert!(result.contains("parameters: {}"));
    }
}
