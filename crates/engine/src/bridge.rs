// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The composed "execute and summarize" operation.
//!
//! One invocation walks validate, run, extract, reduce, sanitize, log,
//! return. Exactly one audit record is appended per attempt: a
//! `run` record with the sanitized result, or an `error` record when
//! validation or launch fails. Redaction always runs before clamping so
//! a secret is never split at a truncation boundary.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use relay_core::guard::{confine, OutOfBounds};
use relay_core::task::TaskError;
use relay_core::telemetry::summarize;
use relay_core::{clamp, redact, BridgeConfig, ExecutionResult, TaskDescriptor, Truncation};

use crate::audit::{
    AuditLog, AuditRecord, ErrorDetail, InputEnvelope, OutputTails, RecordKind, RunSummary,
};
use crate::subprocess::{self, LaunchError, RunSpec};

/// An invocation failed before a result existed.
///
/// A timeout is not in this taxonomy: a killed run still completes with
/// `timed_out = true` on its result.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid task: {0}")]
    InvalidTask(#[from] TaskError),
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl BridgeError {
    /// Stable taxonomy name recorded on error audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTask(_) => "invalid_task",
            Self::OutOfBounds(_) => "out_of_bounds",
            Self::Launch(_) => "launch_failure",
        }
    }
}

/// Brokers one task at a time to the external agent.
///
/// Invocations are independent; the only state shared between concurrent
/// calls is the append-only audit log.
pub struct ExecutionBridge {
    config: BridgeConfig,
    audit: AuditLog,
}

impl ExecutionBridge {
    pub fn new(config: BridgeConfig) -> Self {
        let audit = AuditLog::new(config.run_log_path.clone());
        Self { config, audit }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Run one task to completion and return the sanitized result.
    ///
    /// The caller receives either a complete [`ExecutionResult`]
    /// (possibly timed out) or a structured error with a redacted
    /// message. Raw output and the raw prompt never leave the bridge.
    pub async fn execute(&self, task: TaskDescriptor) -> Result<ExecutionResult, BridgeError> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let envelope = InputEnvelope {
            cwd: task.cwd.clone(),
            sandbox: task.sandbox,
            auto_approve: task.auto_approve,
            model: task.model.clone(),
            prompt_sha256: format!("{:x}", Sha256::digest(task.prompt.as_bytes())),
            prompt_bytes: task.prompt.len(),
        };

        let result = self.run_agent(&request_id, &task).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(result) => {
                tracing::info!(
                    request_id = %request_id,
                    exit_code = result.exit_code,
                    timed_out = result.timed_out,
                    elapsed_ms = duration_ms,
                    "run completed"
                );
                self.audit.append(&AuditRecord {
                    kind: RecordKind::Run,
                    request_id,
                    timestamp,
                    duration_ms,
                    envelope,
                    result: Some(RunSummary {
                        exit_code: result.exit_code,
                        timed_out: result.timed_out,
                    }),
                    telemetry: Some(result.telemetry.clone()),
                    output: Some(OutputTails {
                        final_message_tail: result.final_message.clone(),
                        stdout_tail: result.stdout_tail.clone(),
                        stderr_tail: result.stderr_tail.clone(),
                        truncation: result.truncation,
                    }),
                    error: None,
                });
                Ok(result)
            }
            Err(error) => {
                tracing::error!(
                    request_id = %request_id,
                    kind = error.kind(),
                    elapsed_ms = duration_ms,
                    "run failed"
                );
                self.audit.append(&AuditRecord {
                    kind: RecordKind::Error,
                    request_id,
                    timestamp,
                    duration_ms,
                    envelope,
                    result: None,
                    telemetry: None,
                    output: None,
                    error: Some(ErrorDetail {
                        kind: error.kind().to_string(),
                        message: redact(&error.to_string()),
                    }),
                });
                Err(error)
            }
        }
    }

    async fn run_agent(
        &self,
        request_id: &str,
        task: &TaskDescriptor,
    ) -> Result<ExecutionResult, BridgeError> {
        task.validate()?;
        let cwd = confine(&self.config.workspace_root, &task.cwd)?;

        // The agent writes its final message to a sink file we own; the
        // stream itself carries the interleaved telemetry.
        let last_message_path =
            std::env::temp_dir().join(format!("relay-last-message-{request_id}.txt"));

        let mut args = vec![
            "exec".to_string(),
            "--sandbox".to_string(),
            task.sandbox.cli_value().to_string(),
            "--output-last-message".to_string(),
            last_message_path.display().to_string(),
            "--json".to_string(),
        ];
        if task.auto_approve {
            args.push("--full-auto".to_string());
        }
        if let Some(model) = &task.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args.push("-".to_string());

        let outcome = subprocess::run(RunSpec {
            command: self.config.agent_command.clone(),
            args,
            cwd: cwd.clone(),
            env: Vec::new(),
            stdin: task.prompt.clone(),
            deadline: self.config.deadline,
        })
        .await?;

        let final_message =
            tokio::fs::read_to_string(&last_message_path).await.unwrap_or_default();
        if let Err(error) = tokio::fs::remove_file(&last_message_path).await {
            tracing::debug!(%error, "last-message sink cleanup failed");
        }

        let telemetry = summarize(&outcome.stdout);

        let budget = self.config.output_max_bytes;
        let final_message = clamp(&redact(&final_message), budget);
        let stdout_tail = clamp(&redact(&outcome.stdout), budget);
        let stderr_tail = clamp(&redact(&outcome.stderr), budget);

        Ok(ExecutionResult {
            request_id: request_id.to_string(),
            exit_code: outcome.exit_code,
            timed_out: outcome.timed_out,
            cwd,
            sandbox: task.sandbox,
            auto_approve: task.auto_approve,
            model: task.model.clone(),
            final_message: final_message.text,
            stdout_tail: stdout_tail.text,
            stderr_tail: stderr_tail.text,
            truncation: Truncation {
                stdout: stdout_tail.truncated,
                stderr: stderr_tail.truncated,
                final_message: final_message.truncated,
            },
            telemetry,
        })
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
