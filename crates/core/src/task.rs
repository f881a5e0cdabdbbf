// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task descriptor and sandbox levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Upper bound on the prompt, in encoded bytes.
pub const MAX_PROMPT_BYTES: usize = 12_000;

/// Upper bound on the working-directory string, in encoded bytes.
pub const MAX_CWD_BYTES: usize = 512;

/// Upper bound on the model hint, in encoded bytes.
pub const MAX_MODEL_BYTES: usize = 128;

/// One request to run the external agent. Immutable once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Working directory for the agent; must confine to the workspace root.
    pub cwd: PathBuf,
    /// Prompt fed to the agent on stdin. Never persisted raw.
    pub prompt: String,
    /// Optional model hint, passed through opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Filesystem sandbox level requested for the agent.
    #[serde(default)]
    pub sandbox: SandboxLevel,
    /// Let the agent run its tools without interactive approval.
    #[serde(default)]
    pub auto_approve: bool,
}

impl TaskDescriptor {
    /// Check the request bounds. Rejected tasks never reach a spawn.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.prompt.is_empty() {
            return Err(TaskError::EmptyPrompt);
        }
        if self.prompt.len() > MAX_PROMPT_BYTES {
            return Err(TaskError::PromptTooLarge { bytes: self.prompt.len() });
        }
        let cwd_bytes = self.cwd.as_os_str().len();
        if cwd_bytes == 0 {
            return Err(TaskError::EmptyCwd);
        }
        if cwd_bytes > MAX_CWD_BYTES {
            return Err(TaskError::CwdTooLong { bytes: cwd_bytes });
        }
        if let Some(model) = &self.model {
            if model.len() > MAX_MODEL_BYTES {
                return Err(TaskError::ModelTooLong { bytes: model.len() });
            }
        }
        Ok(())
    }
}

/// A task failed validation before any subprocess was spawned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("prompt exceeds {MAX_PROMPT_BYTES} bytes: {bytes}")]
    PromptTooLarge { bytes: usize },
    #[error("working directory is empty")]
    EmptyCwd,
    #[error("working directory exceeds {MAX_CWD_BYTES} bytes: {bytes}")]
    CwdTooLong { bytes: usize },
    #[error("model hint exceeds {MAX_MODEL_BYTES} bytes: {bytes}")]
    ModelTooLong { bytes: usize },
}

/// Filesystem sandbox level for one agent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SandboxLevel {
    #[default]
    #[serde(rename = "read-only")]
    ReadOnly,
    #[serde(rename = "workspace-write")]
    WorkspaceWrite,
    #[serde(rename = "full-access")]
    FullAccess,
}

impl SandboxLevel {
    /// Value passed to the agent's `--sandbox` flag.
    ///
    /// The agent spells full access `danger-full-access`; the scarier name
    /// stays at the process boundary.
    pub fn cli_value(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::WorkspaceWrite => "workspace-write",
            Self::FullAccess => "danger-full-access",
        }
    }
}

impl fmt::Display for SandboxLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::WorkspaceWrite => write!(f, "workspace-write"),
            Self::FullAccess => write!(f, "full-access"),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
