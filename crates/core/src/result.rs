// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result of one bridge invocation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::task::SandboxLevel;
use crate::telemetry::TelemetrySummary;

/// Which textual outputs were cut down to the byte budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    pub stdout: bool,
    pub stderr: bool,
    pub final_message: bool,
}

/// What the caller gets back from one run. Built once, never mutated.
///
/// Every textual field has been redacted and clamped; the raw prompt and
/// raw output never leave the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub request_id: String,
    pub exit_code: i32,
    pub timed_out: bool,
    pub cwd: PathBuf,
    pub sandbox: SandboxLevel,
    pub auto_approve: bool,
    pub model: Option<String>,
    /// The agent's final message, read from its last-message sink.
    pub final_message: String,
    pub stdout_tail: String,
    pub stderr_tail: String,
    pub truncation: Truncation,
    pub telemetry: TelemetrySummary,
}

impl ExecutionResult {
    /// Render the human-readable block transport layers show verbatim.
    pub fn render_text(&self) -> String {
        [
            format!("request_id: {}", self.request_id),
            format!("exit_code: {}", self.exit_code),
            format!("timed_out: {}", self.timed_out),
            format!("cwd: {}", self.cwd.display()),
            format!("sandbox: {}", self.sandbox),
            format!("auto_approve: {}", self.auto_approve),
            String::new(),
            "--- agent final message ---".to_string(),
            self.final_message.clone(),
            String::new(),
            "--- agent stdout tail ---".to_string(),
            self.stdout_tail.clone(),
            String::new(),
            "--- agent stderr tail ---".to_string(),
            self.stderr_tail.clone(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
