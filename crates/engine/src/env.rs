// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for embedders.
//!
//! The core itself never reads the environment; transport layers call
//! [`load_config`] once at startup and hand the resulting immutable
//! config to the bridge.

use std::path::PathBuf;
use std::time::Duration;

use relay_core::BridgeConfig;

/// Default deadline for one agent run (3 minutes).
const DEFAULT_DEADLINE_MS: u64 = 180_000;

/// Default byte budget per textual output.
const DEFAULT_OUTPUT_MAX_BYTES: usize = 20_000;

/// Build a [`BridgeConfig`] from `RELAY_*` variables, with defaults.
pub fn load_config() -> BridgeConfig {
    BridgeConfig {
        workspace_root: workspace_root(),
        agent_command: agent_command(),
        deadline: deadline(),
        output_max_bytes: output_max_bytes(),
        run_log_path: run_log_path(),
    }
}

/// Confinement root: `RELAY_WORKSPACE_ROOT`, else the current directory.
pub fn workspace_root() -> PathBuf {
    std::env::var("RELAY_WORKSPACE_ROOT")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Agent executable: `RELAY_AGENT_COMMAND`, default `codex`.
pub fn agent_command() -> String {
    std::env::var("RELAY_AGENT_COMMAND").unwrap_or_else(|_| "codex".to_string())
}

/// Run deadline: `RELAY_TIMEOUT_MS`, default 180s.
pub fn deadline() -> Duration {
    std::env::var("RELAY_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(DEFAULT_DEADLINE_MS))
}

/// Output byte budget: `RELAY_OUTPUT_MAX_BYTES`, default 20_000.
pub fn output_max_bytes() -> usize {
    std::env::var("RELAY_OUTPUT_MAX_BYTES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_OUTPUT_MAX_BYTES)
}

/// Audit log path: `RELAY_RUN_LOG_PATH`, default `logs/bridge_runs.jsonl`
/// under the current directory.
pub fn run_log_path() -> PathBuf {
    std::env::var("RELAY_RUN_LOG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("logs")
            .join("bridge_runs.jsonl")
    })
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
