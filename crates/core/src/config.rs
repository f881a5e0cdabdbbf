// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide bridge configuration.
//!
//! Constructed once at startup and passed by reference into the bridge.
//! The core never reads the environment; see `relay-engine::env` for the
//! `RELAY_*` variable surface.

use std::path::PathBuf;
use std::time::Duration;

/// Immutable configuration for the execution bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Confinement root. Caller-supplied working directories must resolve
    /// to this directory or strictly beneath it.
    pub workspace_root: PathBuf,
    /// Executable name or path of the external agent.
    pub agent_command: String,
    /// Wall-clock budget for one agent run. The process is killed
    /// unconditionally when it expires.
    pub deadline: Duration,
    /// Byte budget applied to each textual output (tail-preserving).
    pub output_max_bytes: usize,
    /// Append-only JSONL audit log path. Parent directory is created on
    /// demand by the first append.
    pub run_log_path: PathBuf,
}
