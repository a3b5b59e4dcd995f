// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Keyword routing: picks a downstream route name from the query text.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{NodeControls, RouterControls};
use crate::workers::{Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(15);

pub struct RouterWorker;

#[async_trait]
impl Worker for RouterWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Router(c) => c.clone(),
            _ => RouterControls::default(),
        };
        let query = ctx.input_text("query");
        let context = ctx.input_json("context");

        // Malformed rules fall back to the default route table.
        let rules: Value = serde_json::from_str(&controls.routing_rules)
            .unwrap_or_else(|_| json!({"default": "summarizer"}));
        let default_route = rules
            .get("default")
            .and_then(Value::as_str)
            .unwrap_or("summarizer")
            .to_string();

        let lowered = query.to_lowercase();
        let route = if lowered.contains("tool") || lowered.contains("action") {
            "toolCall".to_string()
        } else if lowered.contains("evaluate") || lowered.contains("score") {
            "evaluator".to_string()
        } else {
            default_route
        };

        let message = format!("Routed to: {}", route);
        let data = json!({
            "query": query,
            "context": context,
            "selected_route": route,
        });

        let mut outputs = HashMap::new();
        outputs.insert("route".to_string(), Value::String(route));
        outputs.insert("data".to_string(), data);

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use std::collections::BTreeMap;

    fn ctx(query: &str, rules: &str) -> WorkerContext {
        let mut inputs = BTreeMap::new();
        inputs.insert("query".to_string(), vec![json!(query)]);
        WorkerContext {
            node_id: "route".to_string(),
            kind: NodeKind::Router,
            inputs,
            controls: NodeControls::Router(RouterControls {
                routing_rules: rules.to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn tool_keywords_route_to_tool_call() {
        let out = RouterWorker
            .run(ctx("use a tool to search", r#"{"default":"summarizer"}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["route"], json!("toolCall"));
        assert_eq!(out.log.message, "Routed to: toolCall");
    }

    #[tokio::test]
    async fn evaluation_keywords_route_to_evaluator() {
        let out = RouterWorker
            .run(ctx("Score this answer", r#"{"default":"summarizer"}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["route"], json!("evaluator"));
    }

    #[tokio::test]
    async fn plain_queries_take_the_default_route() {
        let out = RouterWorker
            .run(ctx("tell me about rust", r#"{"default":"guardrail"}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["route"], json!("guardrail"));
        assert_eq!(out.outputs["data"]["selected_route"], json!("guardrail"));
    }

    #[tokio::test]
    async fn malformed_rules_fall_back_to_summarizer() {
        let out = RouterWorker.run(ctx("hello", "not json")).await.unwrap();
        assert_eq!(out.outputs["route"], json!("summarizer"));
    }
}
