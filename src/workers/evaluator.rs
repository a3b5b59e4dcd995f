// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Mock answer evaluation against a rubric.
//!
//! The score is derived from input lengths so identical inputs always grade
//! identically.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{EvaluatorControls, NodeControls};
use crate::workers::{Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(30);

pub struct EvaluatorWorker;

#[async_trait]
impl Worker for EvaluatorWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Evaluator(c) => c.clone(),
            _ => EvaluatorControls::default(),
        };
        let query = ctx.input_text("query");
        let answer = ctx.input_text("answer");

        // 0.70..=0.99 depending on input sizes.
        let score = 0.70 + ((query.len() + answer.len()) % 30) as f64 / 100.0;
        let score_text = format!("{:.2}", score);

        let feedback = json!({
            "rubric": controls.rubric_name,
            "score": score_text,
            "metrics": {
                "relevance": 0.85,
                "accuracy": 0.92,
                "completeness": 0.78,
            },
            "comments": format!(
                "Mock evaluation using {} rubric. The answer addresses the query adequately.",
                controls.rubric_name
            ),
        });

        let message = format!(
            "Evaluation score: {} (rubric: {})",
            score_text, controls.rubric_name
        );

        let mut outputs = HashMap::new();
        outputs.insert("score".to_string(), Value::String(score_text));
        outputs.insert("feedback".to_string(), feedback);

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "evaluator"
    }
}
