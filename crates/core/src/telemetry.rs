// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Telemetry recovery from the agent's raw stdout.
//!
//! The agent interleaves JSON progress events with human-readable log
//! lines on one stream. `extract_objects` recovers the complete top-level
//! `{...}` literals with a brace-depth scanner; `reduce` folds them into a
//! normalized summary. Both tolerate arbitrary garbage: a fragment that
//! does not parse is skipped, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed sub-command reported by the agent.
///
/// Every field is null-tolerant; the agent's event schema is not trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command: Option<String>,
    pub exit_code: Option<i64>,
    pub status: Option<String>,
}

/// Normalized summary of one run's telemetry events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySummary {
    /// Sub-commands in the order the agent reported them.
    pub commands: Vec<CommandRecord>,
    /// Usage object from the last `turn.completed` event, verbatim.
    pub usage: Option<Value>,
}

/// Extract every complete top-level JSON object from `buffer`, in
/// document order.
///
/// Scanner states are a brace-depth counter, an in-string flag, and an
/// escape flag, so braces and quotes inside string literals are ignored.
/// A candidate span that fails to parse is discarded and the scan
/// continues. An unterminated trailing object is dropped: this operates
/// on one complete captured buffer, not a live stream.
pub fn extract_objects(buffer: &str) -> Vec<Value> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start: Option<usize> = None;

    for (i, ch) in buffer.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                }
                if depth == 0 {
                    if let Some(begin) = start.take() {
                        let candidate = &buffer[begin..i + ch.len_utf8()];
                        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                            out.push(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Fold an event sequence into a [`TelemetrySummary`].
///
/// `item.started` / `item.completed` events whose item is a
/// `command_execution` contribute one command entry each; the last
/// `turn.completed` event carrying a `usage` field wins. Anything else is
/// skipped.
pub fn reduce(events: &[Value]) -> TelemetrySummary {
    let mut summary = TelemetrySummary::default();

    for event in events {
        match event.get("type").and_then(Value::as_str) {
            Some("item.started") | Some("item.completed") => {
                let Some(item) = event.get("item") else {
                    continue;
                };
                if item.get("type").and_then(Value::as_str) != Some("command_execution") {
                    continue;
                }
                summary.commands.push(CommandRecord {
                    command: item.get("command").and_then(Value::as_str).map(str::to_string),
                    exit_code: item.get("exit_code").and_then(Value::as_i64),
                    status: item.get("status").and_then(Value::as_str).map(str::to_string),
                });
            }
            Some("turn.completed") => {
                if let Some(usage) = event.get("usage") {
                    if !usage.is_null() {
                        summary.usage = Some(usage.clone());
                    }
                }
            }
            _ => {}
        }
    }

    summary
}

/// Extract and reduce in one step, from the raw captured stdout.
pub fn summarize(stdout: &str) -> TelemetrySummary {
    reduce(&extract_objects(stdout))
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
