// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full-run specs: telemetry recovery, sanitization, deadline kill.

use crate::prelude::*;
use std::time::{Duration, Instant};

const HAPPY_AGENT: &str = r#"cat > /dev/null
echo "booting stub agent"
echo '{"type":"item.started","item":{"type":"command_execution","command":"ls -la","status":"in_progress"}}'
echo 'interleaved noise {not json}'
echo '{"type":"item.completed","item":{"type":"command_execution","command":"ls -la","exit_code":0,"status":"completed"}}'
echo '{"type":"turn.completed","usage":{"input_tokens":9,"output_tokens":3}}'
printf 'finished OK' > "$out"
"#;

#[tokio::test]
async fn successful_run_returns_summary_and_one_run_record() {
    let h = Harness::new(HAPPY_AGENT);

    let result = h.bridge.execute(task(&h.root, "list the files")).await.unwrap();

    assert_eq!(result.exit_code, 0);
    assert!(!result.timed_out);
    assert_eq!(result.final_message, "finished OK");
    assert_eq!(result.telemetry.commands.len(), 2);
    assert_eq!(result.telemetry.commands[1].command.as_deref(), Some("ls -la"));
    assert_eq!(result.telemetry.commands[1].exit_code, Some(0));
    assert_eq!(result.telemetry.usage.as_ref().unwrap()["input_tokens"], 9);

    let records = h.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["kind"], "run");
    assert_eq!(records[0]["result"]["exit_code"], 0);
    assert_eq!(records[0]["result"]["timed_out"], false);
    assert_eq!(records[0]["telemetry"]["commands"].as_array().unwrap().len(), 2);
    assert_eq!(records[0]["output"]["final_message_tail"], "finished OK");
}

#[tokio::test]
async fn secrets_in_output_are_redacted_before_persistence() {
    let h = Harness::new(
        r#"cat > /dev/null
echo "token sk-abcDEF123456789012345678 leaked"
printf 'used OPENAI_API_KEY=supersecret here' > "$out"
"#,
    );

    let result = h.bridge.execute(task(&h.root, "do a thing")).await.unwrap();

    assert!(result.stdout_tail.contains("[REDACTED_KEY]"));
    assert!(!result.stdout_tail.contains("sk-abcDEF"));
    assert_eq!(result.final_message, "used OPENAI_API_KEY=[REDACTED] here");

    let content = std::fs::read_to_string(&h.log).unwrap();
    assert!(!content.contains("sk-abcDEF"));
    assert!(!content.contains("supersecret"));
}

#[tokio::test]
async fn prompt_never_reaches_the_audit_trail() {
    let h = Harness::new(HAPPY_AGENT);

    h.bridge.execute(task(&h.root, "do not persist this prompt")).await.unwrap();

    let content = std::fs::read_to_string(&h.log).unwrap();
    assert!(!content.contains("do not persist this prompt"));
    let records = h.records();
    assert_eq!(records[0]["prompt_bytes"], 26);
    assert_eq!(records[0]["prompt_sha256"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn deadline_kill_reports_timed_out_not_an_error() {
    let h = Harness::with_deadline("exec sleep 5\n", Duration::from_millis(50));

    let started = Instant::now();
    let result = h.bridge.execute(task(&h.root, "never finishes")).await.unwrap();

    assert!(result.timed_out);
    assert_eq!(result.exit_code, -1);
    assert!(started.elapsed() < Duration::from_secs(3), "kill must preempt the sleep");

    let records = h.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["kind"], "run");
    assert_eq!(records[0]["result"]["timed_out"], true);
}

#[tokio::test]
async fn oversize_output_keeps_only_the_tail() {
    let h = Harness::with_output_budget(
        r#"cat > /dev/null
i=0
while [ $i -lt 200 ]; do echo "filler line $i"; i=$((i+1)); done
echo "THE-END"
"#,
        64,
    );

    let result = h.bridge.execute(task(&h.root, "be chatty")).await.unwrap();

    assert!(result.truncation.stdout);
    assert!(result.stdout_tail.len() <= 64);
    assert!(result.stdout_tail.ends_with("THE-END\n"));

    let records = h.records();
    assert_eq!(records[0]["output"]["truncation"]["stdout"], true);
}

#[tokio::test]
async fn task_options_become_agent_flags() {
    // The stub reports its own argv so the spec can see the wire format.
    let h = Harness::new(
        r#"cat > /dev/null
printf '%s ' "$@"
printf 'ok' > "$out"
"#,
    );

    let mut t = task(&h.root, "check flags");
    t.sandbox = SandboxLevel::FullAccess;
    t.auto_approve = true;
    t.model = Some("small-model".to_string());
    let result = h.bridge.execute(t).await.unwrap();

    assert!(result.stdout_tail.contains("exec"));
    assert!(result.stdout_tail.contains("--sandbox danger-full-access"));
    assert!(result.stdout_tail.contains("--full-auto"));
    assert!(result.stdout_tail.contains("--model small-model"));
    assert!(result.stdout_tail.ends_with("- "));
}
