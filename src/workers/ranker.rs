// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Mock cross-encoder reranking: position-derived scores with a threshold cut.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry};
use crate::errors::WorkerError;
use crate::graph::{NodeControls, RankerControls};
use crate::workers::{Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(25);

pub struct RankerWorker;

#[async_trait]
impl Worker for RankerWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Ranker(c) => c.clone(),
            _ => RankerControls::default(),
        };
        let chunks = ctx.input_array("chunks");
        let total = chunks.len();

        // Rerank score decays with the incoming position; chunks under the
        // threshold are dropped before sorting.
        let mut ranked: Vec<(f64, Value)> = chunks
            .into_iter()
            .enumerate()
            .filter_map(|(idx, chunk)| {
                let score = 0.95 - (idx as f64) * 0.08;
                if score < controls.score_threshold {
                    return None;
                }
                let mut obj = chunk.as_object().cloned().unwrap_or_default();
                obj.insert("rerank_score".to_string(), json!(score));
                obj.insert("original_rank".to_string(), json!(idx));
                Some((score, Value::Object(obj)))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let kept = ranked.len();
        let message = format!(
            "Reranked {} chunks, kept {} above threshold {}",
            total, kept, controls.score_threshold
        );

        let mut outputs = HashMap::new();
        outputs.insert(
            "ranked".to_string(),
            Value::Array(ranked.into_iter().map(|(_, chunk)| chunk).collect()),
        );

        Ok(WorkerOutput {
            outputs,
            log: LogEntry::success(ctx.node_id, ctx.kind, start, message),
        })
    }

    fn name(&self) -> &'static str {
        "ranker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use std::collections::BTreeMap;

    fn ctx(chunks: Vec<Value>, threshold: f64) -> WorkerContext {
        let mut inputs = BTreeMap::new();
        inputs.insert("chunks".to_string(), vec![Value::Array(chunks)]);
        WorkerContext {
            node_id: "rank".to_string(),
            kind: NodeKind::Ranker,
            inputs,
            controls: NodeControls::Ranker(RankerControls {
                score_threshold: threshold,
                ..RankerControls::default()
            }),
        }
    }

    fn chunk(id: &str) -> Value {
        json!({"id": id, "text": "t", "score": 0.5})
    }

    #[tokio::test]
    async fn annotates_and_sorts_by_rerank_score() {
        let out = RankerWorker
            .run(ctx(vec![chunk("a"), chunk("b"), chunk("c")], 0.5))
            .await
            .unwrap();
        let ranked = out.outputs["ranked"].as_array().unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0]["id"], json!("a"));
        assert_eq!(ranked[0]["rerank_score"], json!(0.95));
        assert_eq!(ranked[0]["original_rank"], json!(0));
        let scores: Vec<f64> = ranked
            .iter()
            .map(|c| c["rerank_score"].as_f64().unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn drops_chunks_below_threshold() {
        // Scores run 0.95, 0.87, 0.79; a 0.9 threshold keeps only the first.
        let out = RankerWorker
            .run(ctx(vec![chunk("a"), chunk("b"), chunk("c")], 0.9))
            .await
            .unwrap();
        let ranked = out.outputs["ranked"].as_array().unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(out.log.message, "Reranked 3 chunks, kept 1 above threshold 0.9");
    }

    #[tokio::test]
    async fn empty_input_yields_empty_ranking() {
        let out = RankerWorker.run(ctx(vec![], 0.5)).await.unwrap();
        assert_eq!(out.outputs["ranked"], json!([]));
    }
}
