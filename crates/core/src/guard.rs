// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path confinement for caller-supplied working directories.
//!
//! `confine` is the sole authorization gate for where a subprocess may
//! execute. It must be called before any filesystem or process operation
//! that accepts a caller-supplied path.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// A caller-supplied path escaped its confinement root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path escapes workspace root: {path}")]
pub struct OutOfBounds {
    pub path: PathBuf,
}

/// Resolve `candidate` to an absolute, normalized path and verify it is
/// `root` or strictly beneath it.
///
/// Relative candidates are resolved against `root`. Normalization is
/// lexical (`.` and `..` are folded without touching the filesystem), and
/// the containment check is component-wise, so a sibling that merely
/// shares `root` as a string prefix (`/a/bc` under root `/a/b`) is
/// rejected.
pub fn confine(root: &Path, candidate: &Path) -> Result<PathBuf, OutOfBounds> {
    let root = normalize(root);
    let resolved = if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&root.join(candidate))
    };

    if resolved == root || resolved.starts_with(&root) {
        Ok(resolved)
    } else {
        Err(OutOfBounds { path: resolved })
    }
}

/// Fold `.` and `..` components lexically.
///
/// `..` at the filesystem root stays at the root, matching the OS
/// resolution of `/..`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
