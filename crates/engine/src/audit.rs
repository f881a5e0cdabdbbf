// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit trail, one JSON record per line.
//!
//! The file is opened for append on every write so concurrent
//! invocations interleave whole lines without sharing a handle. Append
//! failures are logged via tracing but never propagate: a logging
//! failure must not mask the execution result.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use relay_core::task::SandboxLevel;
use relay_core::telemetry::TelemetrySummary;
use relay_core::Truncation;

/// Whether an invocation produced a result or failed before one existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Run,
    Error,
}

/// Digest of the request input. Never carries the raw prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEnvelope {
    pub cwd: PathBuf,
    pub sandbox: SandboxLevel,
    pub auto_approve: bool,
    pub model: Option<String>,
    /// Irreversible content hash of the prompt.
    pub prompt_sha256: String,
    pub prompt_bytes: usize,
}

/// Exit summary for a completed run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunSummary {
    pub exit_code: i32,
    pub timed_out: bool,
}

/// Sanitized output tails carried on a `run` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputTails {
    pub final_message_tail: String,
    pub stdout_tail: String,
    pub stderr_tail: String,
    pub truncation: Truncation,
}

/// Redacted failure detail carried on an `error` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

/// One durable line in the audit log. Written exactly once per
/// invocation attempt, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub kind: RecordKind,
    pub request_id: String,
    /// RFC 3339 timestamp of when the invocation was accepted.
    pub timestamp: String,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub envelope: InputEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetrySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputTails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

/// Append-only record store at a fixed path.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line.
    ///
    /// Failures are logged and swallowed; operators watch for the
    /// warning to detect audit-trail gaps.
    pub fn append(&self, record: &AuditRecord) {
        if let Err(error) = self.try_append(record) {
            tracing::warn!(path = %self.path.display(), %error, "audit append failed");
        }
    }

    fn try_append(&self, record: &AuditRecord) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        // serde_json escapes embedded newlines, so a record is always
        // exactly one line.
        let line = serde_json::to_string(record).map_err(std::io::Error::other)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
