// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Policy screening of generated answers.
//!
//! Blocking is content-derived: a PII policy trips on long digit runs and SSN
//! mentions, a toxicity policy on a small deny list. A blocked answer is still
//! a successful node execution; only the entry's log status flips to error.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::report::{now_ms, LogEntry, LogStatus};
use crate::errors::WorkerError;
use crate::graph::{GuardrailControls, NodeControls};
use crate::workers::{Worker, WorkerContext, WorkerOutput};

const SIMULATED_LATENCY: Duration = Duration::from_millis(20);

const BLOCKED_RESULT: &str = "[BLOCKED BY GUARDRAIL] Content did not pass safety checks.";

pub struct GuardrailWorker;

fn looks_like_pii(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    if lowered.contains("ssn") || lowered.contains("social security") {
        return true;
    }
    // Nine or more consecutive digits reads as an identifier.
    let mut run = 0usize;
    for ch in answer.chars() {
        if ch.is_ascii_digit() {
            run += 1;
            if run >= 9 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

fn looks_toxic(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    ["hate", "stupid", "idiot"]
        .iter()
        .any(|word| lowered.contains(word))
}

#[async_trait]
impl Worker for GuardrailWorker {
    async fn run(&self, ctx: WorkerContext) -> Result<WorkerOutput, WorkerError> {
        let start = now_ms();
        tokio::time::sleep(SIMULATED_LATENCY).await;

        let controls = match &ctx.controls {
            NodeControls::Guardrail(c) => c.clone(),
            _ => GuardrailControls::default(),
        };
        let answer = ctx.input_text("answer");

        let policies: Value =
            serde_json::from_str(&controls.policies).unwrap_or_else(|_| json!({}));
        let policy_names: Vec<String> = policies
            .as_object()
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();

        let enabled = |name: &str| policies.get(name).and_then(Value::as_bool).unwrap_or(false);

        let reason = if enabled("blockPII") && looks_like_pii(&answer) {
            Some("Content violates policy: detected potential PII")
        } else if enabled("blockToxic") && looks_toxic(&answer) {
            Some("Content violates policy: detected toxic language")
        } else {
            None
        };
        let blocked = reason.is_some();

        let status = json!({
            "passed": !blocked,
            "policies_checked": policy_names,
            "reason": reason.unwrap_or("All policies passed"),
        });

        let result = if blocked {
            BLOCKED_RESULT.to_string()
        } else {
            answer
        };

        let log = if blocked {
            let mut entry = LogEntry::success(
                ctx.node_id,
                ctx.kind,
                start,
                "Content blocked by guardrail",
            );
            entry.status = LogStatus::Error;
            entry
        } else {
            LogEntry::success(ctx.node_id, ctx.kind, start, "Content passed guardrail checks")
        };

        let mut outputs = HashMap::new();
        outputs.insert("result".to_string(), Value::String(result));
        outputs.insert("status".to_string(), status);

        Ok(WorkerOutput { outputs, log })
    }

    fn name(&self) -> &'static str {
        "guardrail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use std::collections::BTreeMap;

    fn ctx(answer: &str, policies: &str) -> WorkerContext {
        let mut inputs = BTreeMap::new();
        inputs.insert("answer".to_string(), vec![json!(answer)]);
        WorkerContext {
            node_id: "guard".to_string(),
            kind: NodeKind::Guardrail,
            inputs,
            controls: NodeControls::Guardrail(GuardrailControls {
                policies: policies.to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn clean_content_passes_through() {
        let out = GuardrailWorker
            .run(ctx("rust is memory safe", r#"{"blockPII":true,"blockToxic":true}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["result"], json!("rust is memory safe"));
        assert_eq!(out.outputs["status"]["passed"], json!(true));
        assert_eq!(out.log.status, LogStatus::Success);
    }

    #[tokio::test]
    async fn pii_is_blocked_with_error_log_but_ok_result() {
        let out = GuardrailWorker
            .run(ctx("my ssn is 123456789", r#"{"blockPII":true}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["result"], json!(BLOCKED_RESULT));
        assert_eq!(out.outputs["status"]["passed"], json!(false));
        assert_eq!(out.log.status, LogStatus::Error);
        assert_eq!(out.log.message, "Content blocked by guardrail");
    }

    #[tokio::test]
    async fn disabled_policies_do_not_block() {
        let out = GuardrailWorker
            .run(ctx("123456789012", r#"{"blockPII":false}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["status"]["passed"], json!(true));
    }

    #[tokio::test]
    async fn toxic_language_is_blocked() {
        let out = GuardrailWorker
            .run(ctx("you are an idiot", r#"{"blockToxic":true}"#))
            .await
            .unwrap();
        assert_eq!(out.outputs["status"]["passed"], json!(false));
        assert_eq!(
            out.outputs["status"]["reason"],
            json!("Content violates policy: detected toxic language")
        );
    }
}
