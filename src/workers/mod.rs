// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Node workers: the async unit of work behind each node kind.
//!
//! The engine dispatches each node to a [`Worker`] through the
//! [`WorkerRegistry`]. The built-in workers are deterministic mocks of real
//! retrieval, LLM, and tool backends: they sleep a small simulated latency
//! and derive their outputs from their inputs and controls, so runs are
//! reproducible. Swap in real implementations by registering replacements.
//!
//! Memoization is owned explicitly: a [`WorkerCache`] is injected into the
//! registry (or omitted for no caching). Cacheable workers are keyed by node
//! id plus the canonical JSON of their ordered inputs; a cache hit replays the
//! stored outputs with a ` (cached)` marker appended to the log message.

mod evaluator;
mod guardrail;
mod input;
mod output;
mod ranker;
mod retriever;
mod router;
mod summarizer;
mod tool_call;

pub use evaluator::EvaluatorWorker;
pub use guardrail::GuardrailWorker;
pub use input::InputWorker;
pub use output::OutputWorker;
pub use ranker::RankerWorker;
pub use retriever::RetrieverWorker;
pub use router::RouterWorker;
pub use summarizer::SummarizerWorker;
pub use tool_call::ToolCallWorker;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::engine::report::LogEntry;
use crate::errors::WorkerError;
use crate::graph::{NodeControls, NodeKind};

/// Everything a worker gets to see for one node execution.
///
/// `inputs` maps input slot names to ordered fan-in lists: multiple
/// connections into the same slot accumulate in connection-declaration order,
/// and single-valued slots read element 0. Workers receive owned copies and
/// must not rely on mutating shared state.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub node_id: String,
    pub kind: NodeKind,
    pub inputs: BTreeMap<String, Vec<Value>>,
    pub controls: NodeControls,
}

impl WorkerContext {
    /// The first value gathered for a slot, if any.
    pub fn first_input(&self, slot: &str) -> Option<&Value> {
        self.inputs.get(slot).and_then(|values| values.first())
    }

    /// Every value gathered for a slot, in fan-in order.
    pub fn input_values(&self, slot: &str) -> &[Value] {
        self.inputs.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a slot rendered as text; empty when absent.
    pub fn input_text(&self, slot: &str) -> String {
        match self.first_input(slot) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// First value of a slot as JSON; `Null` when absent.
    pub fn input_json(&self, slot: &str) -> Value {
        self.first_input(slot).cloned().unwrap_or(Value::Null)
    }

    /// Elements of the first value of a slot, when that value is an array.
    pub fn input_array(&self, slot: &str) -> Vec<Value> {
        match self.first_input(slot) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

/// What a worker hands back: output slot values plus its own log entry.
#[derive(Debug, Clone)]
pub struct WorkerOutput {
    pub outputs: HashMap<String, Value>,
    pub log: LogEntry,
}

/// The async unit of work behind a node kind.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Compute the node's outputs from gathered inputs and controls.
    ///
    /// Must be idempotent for identical `(node_id, inputs, controls)` when
    /// [`Worker::cacheable`] returns true.
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError>;

    fn name(&self) -> &'static str;

    /// Whether results may be memoized by `(node_id, inputs)`.
    fn cacheable(&self) -> bool {
        false
    }
}

/// Explicitly owned memoization store for cacheable workers.
#[derive(Debug, Default)]
pub struct WorkerCache {
    entries: Mutex<HashMap<String, WorkerOutput>>,
}

impl WorkerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<WorkerOutput> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn insert(&self, key: String, output: WorkerOutput) {
        self.entries.lock().await.insert(key, output);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// Maps node kinds to workers and owns the optional memoization cache.
pub struct WorkerRegistry {
    workers: HashMap<NodeKind, Arc<dyn Worker>>,
    cache: Option<Arc<WorkerCache>>,
}

impl WorkerRegistry {
    /// An empty registry with no cache.
    pub fn new() -> Self {
        Self {
            workers: HashMap::new(),
            cache: None,
        }
    }

    /// The full built-in worker set with a fresh cache.
    pub fn builtin() -> Self {
        let mut registry = Self::new().with_cache(Arc::new(WorkerCache::new()));
        registry.register(NodeKind::Input, Arc::new(InputWorker));
        registry.register(NodeKind::Retriever, Arc::new(RetrieverWorker));
        registry.register(NodeKind::Ranker, Arc::new(RankerWorker));
        registry.register(NodeKind::Router, Arc::new(RouterWorker));
        registry.register(NodeKind::ToolCall, Arc::new(ToolCallWorker));
        registry.register(NodeKind::Summarizer, Arc::new(SummarizerWorker));
        registry.register(NodeKind::Evaluator, Arc::new(EvaluatorWorker));
        registry.register(NodeKind::Guardrail, Arc::new(GuardrailWorker));
        registry.register(NodeKind::Output, Arc::new(OutputWorker));
        registry
    }

    pub fn with_cache(mut self, cache: Arc<WorkerCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn register(&mut self, kind: NodeKind, worker: Arc<dyn Worker>) {
        self.workers.insert(kind, worker);
    }

    pub fn get(&self, kind: NodeKind) -> Option<&Arc<dyn Worker>> {
        self.workers.get(&kind)
    }

    /// Resolve the node's kind to a worker and run it, applying memoization
    /// for cacheable workers.
    pub async fn dispatch(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let worker = self
            .workers
            .get(&ctx.kind)
            .ok_or_else(|| WorkerError::NotRegistered {
                kind: ctx.kind.to_string(),
            })?
            .clone();

        let cache = if worker.cacheable() {
            self.cache.as_ref().map(|cache| {
                // BTreeMap inputs serialize canonically, keeping keys stable.
                let inputs = serde_json::to_string(&ctx.inputs).unwrap_or_default();
                (cache.clone(), format!("{}-{}", ctx.node_id, inputs))
            })
        } else {
            None
        };

        if let Some((cache, key)) = &cache {
            if let Some(mut hit) = cache.get(key).await {
                hit.log.message.push_str(" (cached)");
                return Ok(hit);
            }
        }

        let output = worker.run(ctx).await?;

        if let Some((cache, key)) = cache {
            cache.insert(key, output.clone()).await;
        }

        Ok(output)
    }

    /// Drop all memoized results, if a cache is attached.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Trim text for log messages, appending an ellipsis when cut.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(kind: NodeKind) -> WorkerContext {
        WorkerContext {
            node_id: "n1".to_string(),
            kind,
            inputs: BTreeMap::new(),
            controls: NodeControls::defaults_for(kind),
        }
    }

    #[tokio::test]
    async fn dispatch_fails_for_unregistered_kind() {
        let registry = WorkerRegistry::new();
        let err = registry
            .dispatch(context(NodeKind::Summarizer))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WorkerError::NotRegistered {
                kind: "summarizer".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "No worker found for node type: summarizer"
        );
    }

    #[tokio::test]
    async fn cacheable_worker_hits_cache_on_second_dispatch() {
        let registry = WorkerRegistry::builtin();
        let mut ctx = context(NodeKind::Retriever);
        ctx.inputs
            .insert("query".to_string(), vec![json!("what is rust")]);

        let first = registry.dispatch(ctx.clone()).await.unwrap();
        assert!(!first.log.message.ends_with("(cached)"));

        let second = registry.dispatch(ctx).await.unwrap();
        assert!(second.log.message.ends_with("(cached)"));
        assert_eq!(second.outputs, first.outputs);
    }

    #[tokio::test]
    async fn clear_cache_forces_recomputation() {
        let cache = Arc::new(WorkerCache::new());
        let registry = WorkerRegistry::builtin().with_cache(cache.clone());
        let mut ctx = context(NodeKind::Retriever);
        ctx.inputs.insert("query".to_string(), vec![json!("q")]);

        registry.dispatch(ctx.clone()).await.unwrap();
        assert_eq!(cache.len().await, 1);

        registry.clear_cache().await;
        assert_eq!(cache.len().await, 0);

        let after = registry.dispatch(ctx).await.unwrap();
        assert!(!after.log.message.ends_with("(cached)"));
    }

    #[tokio::test]
    async fn uncached_registry_never_memoizes() {
        let mut registry = WorkerRegistry::new();
        registry.register(NodeKind::Retriever, Arc::new(RetrieverWorker));
        let mut ctx = context(NodeKind::Retriever);
        ctx.inputs.insert("query".to_string(), vec![json!("q")]);

        registry.dispatch(ctx.clone()).await.unwrap();
        let second = registry.dispatch(ctx).await.unwrap();
        assert!(!second.log.message.ends_with("(cached)"));
    }

    #[test]
    fn fan_in_values_keep_order() {
        let mut ctx = context(NodeKind::Output);
        ctx.inputs.insert(
            "value".to_string(),
            vec![json!("first"), json!("second")],
        );
        assert_eq!(ctx.first_input("value"), Some(&json!("first")));
        assert_eq!(ctx.input_values("value").len(), 2);
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
        assert_eq!(truncate("this is too long", 7), "this is...");
    }
}
