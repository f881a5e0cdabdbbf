// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secret redaction for everything the bridge stores or returns.
//!
//! Scrubs known credential shapes before text reaches the audit log or a
//! caller. Redaction runs before clamping so a secret is never split at a
//! truncation boundary and partially exposed.

use std::sync::LazyLock;

use regex::Regex;

// Pattern literals are exercised by the tests in redact_tests.rs.
#[allow(clippy::expect_used)]
static API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9_-]{20,}").expect("api key pattern"));

#[allow(clippy::expect_used)]
static BEARER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Bearer\s+)[A-Za-z0-9._~+/=-]+").expect("bearer pattern"));

#[allow(clippy::expect_used)]
static ENV_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(OPENAI_API_KEY\s*=\s*)\S+").expect("env assignment pattern"));

/// Replace known credential shapes with fixed placeholders.
///
/// Applied in order: API-key-shaped tokens, bearer-header values (prefix
/// preserved), and `OPENAI_API_KEY=` assignments. Idempotent: redacting
/// already-redacted text is a no-op.
pub fn redact(text: &str) -> String {
    let pass = API_KEY.replace_all(text, "[REDACTED_KEY]");
    let pass = BEARER.replace_all(&pass, "${1}[REDACTED_TOKEN]");
    ENV_ASSIGNMENT.replace_all(&pass, "${1}[REDACTED]").into_owned()
}

#[cfg(test)]
#[path = "redact_tests.rs"]
mod tests;
