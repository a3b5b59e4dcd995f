// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use ragweave::engine::{validate_graph, GraphExecutor};
use ragweave::graph::{GraphSnapshot, InputControls, Node, NodeControls, NodeKind};
use ragweave::observability::messages::validation::{GraphValidationFailed, ValidationWarningFound};
use ragweave::observability::messages::StructuredLog;
use ragweave::workers::WorkerRegistry;

/// A representative retrieval pipeline: question in, retrieval, reranking,
/// summarization, policy screening, answer out.
fn sample_pipeline(question: &str) -> GraphSnapshot {
    let mut graph = GraphSnapshot::new();
    graph.insert_node(Node::with_controls(
        "question",
        NodeKind::Input,
        NodeControls::Input(InputControls {
            value: question.to_string(),
        }),
    ));
    graph.add_node("retriever", NodeKind::Retriever);
    graph.add_node("ranker", NodeKind::Ranker);
    graph.add_node("summarizer", NodeKind::Summarizer);
    graph.add_node("guardrail", NodeKind::Guardrail);
    graph.add_node("answer", NodeKind::Output);

    graph.connect("question", "value", "retriever", "query");
    graph.connect("retriever", "chunks", "ranker", "chunks");
    graph.connect("ranker", "ranked", "summarizer", "chunks");
    graph.connect("summarizer", "summary", "guardrail", "answer");
    graph.connect("guardrail", "result", "answer", "value");
    graph
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What makes Rust memory safe?".to_string());

    println!("🧵 ragweave pipeline demo");
    println!("Question: \"{}\"", question);
    println!();

    let graph = sample_pipeline(&question);

    let validation = validate_graph(&graph);
    if !validation.valid {
        GraphValidationFailed {
            error_count: validation.errors.len(),
            warning_count: validation.warnings.len(),
        }
        .log();
        for error in &validation.errors {
            eprintln!("❌ {}", error);
        }
        anyhow::bail!("graph failed validation");
    }
    for warning in &validation.warnings {
        ValidationWarningFound {
            kind: warning.kind(),
            detail: &warning.to_string(),
        }
        .log();
        println!("⚠️  {}", warning);
    }

    let mut executor = GraphExecutor::new(Arc::new(WorkerRegistry::builtin()));

    let started = Instant::now();
    let result = executor.execute_graph(&graph, true).await;
    println!(
        "\n📊 Full run: success={}, {} nodes in {:?}",
        result.success,
        result.logs.len(),
        started.elapsed()
    );
    for log in &result.logs {
        println!(
            "  {:>4}ms  {:<12} {}",
            log.duration, log.node_id, log.message
        );
    }
    for (node_id, value) in &result.outputs {
        println!("\n🎯 {} → {}", node_id, value);
    }

    // Re-run from the retriever; upstream state is reused and the cached
    // retrieval replays without recomputation.
    let started = Instant::now();
    let forward = executor.execute_forward("retriever", &graph).await;
    println!(
        "\n🔁 Forward run from 'retriever': success={}, {} nodes in {:?}",
        forward.success,
        forward.logs.len(),
        started.elapsed()
    );
    for log in &forward.logs {
        println!(
            "  {:>4}ms  {:<12} {}",
            log.duration, log.node_id, log.message
        );
    }

    Ok(())
}
