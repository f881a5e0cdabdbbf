// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Confinement specs: no process ever runs outside the workspace root.

use crate::prelude::*;
use std::path::Path;

/// Stub that proves it ran by dropping a marker file next to itself.
const MARKER_AGENT: &str = r#"cat > /dev/null
touch "$(dirname "$0")/agent-ran.marker"
printf 'ran' > "$out"
"#;

#[tokio::test]
async fn outside_root_never_spawns_and_never_logs_a_run() {
    let h = Harness::new(MARKER_AGENT);

    let err = h.bridge.execute(task(Path::new("/outside/of/everything"), "hi")).await.unwrap_err();
    assert!(err.to_string().contains("escapes workspace root"));

    let marker = h.root.parent().unwrap().join("agent-ran.marker");
    assert!(!marker.exists(), "agent must not have been spawned");

    for record in h.records() {
        assert_eq!(record["kind"], "error");
        assert!(record.get("result").is_none());
    }
}

#[tokio::test]
async fn sibling_directory_sharing_the_root_prefix_is_rejected() {
    let h = Harness::new(MARKER_AGENT);

    // A real directory whose name merely extends the root's.
    let evil = h.root.parent().unwrap().join("workspace-evil");
    std::fs::create_dir_all(&evil).unwrap();

    h.bridge.execute(task(&evil, "hi")).await.unwrap_err();
    assert!(!h.root.parent().unwrap().join("agent-ran.marker").exists());
}

#[tokio::test]
async fn dotdot_escape_from_inside_the_root_is_rejected() {
    let h = Harness::new(MARKER_AGENT);

    let sneaky = h.root.join("sub").join("..").join("..").join("elsewhere");
    h.bridge.execute(task(&sneaky, "hi")).await.unwrap_err();
}

#[tokio::test]
async fn subdirectory_of_the_root_is_allowed() {
    let h = Harness::new(MARKER_AGENT);
    let sub = h.root.join("nested");
    std::fs::create_dir_all(&sub).unwrap();

    let result = h.bridge.execute(task(&sub, "hi")).await.unwrap();
    assert_eq!(result.cwd, sub);
    assert_eq!(result.final_message, "ran");
}
