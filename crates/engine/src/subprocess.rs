// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with a hard wall-clock deadline.
//!
//! One call owns exactly one child process: spawn, feed stdin, accumulate
//! both output streams, and race process exit against the deadline. On
//! expiry the child is SIGKILLed, not asked to shut down gracefully. A
//! kill is reported as `timed_out` on an
//! otherwise normal outcome, not as an error; only a failure to launch is
//! an error.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// What to run and under which limits.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Extra environment entries on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// Payload written to the child's stdin, which is then closed.
    pub stdin: String,
    pub deadline: Duration,
}

/// Outcome of one completed (or killed) run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Exit code, `-1` when the OS reports none (killed by signal).
    pub exit_code: i32,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

/// The child process could not be started or awaited.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run `spec` to completion, enforcing its deadline.
///
/// Resolves once the process has exited (or been killed) and both output
/// streams have closed. The deadline timer is dropped on resolution
/// either way, so no timer outlives the call.
pub async fn run(spec: RunSpec) -> Result<RunOutcome, LaunchError> {
    let mut cmd = Command::new(&spec.command);
    cmd.args(&spec.args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }

    let mut child = cmd
        .spawn()
        .map_err(|source| LaunchError::Spawn { command: spec.command.clone(), source })?;

    // Drain both output pipes before anything else so a chatty child
    // never fills a pipe buffer while we are still feeding stdin.
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    // Feed the payload and close stdin so the child sees EOF. A child
    // that exits without reading breaks the pipe; that is its business.
    if let Some(mut stdin) = child.stdin.take() {
        let payload = spec.stdin.clone();
        tokio::spawn(async move {
            if let Err(error) = stdin.write_all(payload.as_bytes()).await {
                tracing::debug!(%error, "stdin write failed");
            }
        });
    }

    let mut timed_out = false;
    let status = match tokio::time::timeout(spec.deadline, child.wait()).await {
        Ok(waited) => {
            waited.map_err(|source| LaunchError::Wait { command: spec.command.clone(), source })?
        }
        Err(_elapsed) => {
            timed_out = true;
            tracing::warn!(
                command = %spec.command,
                deadline_ms = spec.deadline.as_millis() as u64,
                "deadline exceeded, killing process"
            );
            if let Err(error) = child.kill().await {
                tracing::debug!(command = %spec.command, %error, "kill after deadline failed");
            }
            child
                .wait()
                .await
                .map_err(|source| LaunchError::Wait { command: spec.command.clone(), source })?
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    Ok(RunOutcome {
        exit_code: status.code().unwrap_or(-1),
        timed_out,
        stdout,
        stderr,
    })
}

/// Accumulate a pipe to the end on a background task, decoding lossily.
fn drain<R>(pipe: Option<R>) -> tokio::task::JoinHandle<String>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut pipe) = pipe else {
            return String::new();
        };
        let mut buf = Vec::new();
        if let Err(error) = pipe.read_to_end(&mut buf).await {
            tracing::debug!(%error, "output stream read failed");
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
