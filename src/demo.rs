//! Demo heuristic analyzer.
//!
//! Offline stand-in for the remote analysis service: a fixed sequence of
//! substring/regex checks over the snippet text. The checks are independent
//! and several may fire for the same snippet. None of them are line-aware,
//! so every synthetic finding points at line 1.

use lazy_static::lazy_static;
use regex::Regex;

use crate::finding::{AnalysisResponse, Finding, Severity};
use crate::ident;

lazy_static! {
    /// `eval` identifier followed by optional whitespace and an open paren.
    static ref EVAL_PATTERN: Regex = Regex::new(r"\beval\s*\(").unwrap();

    /// Assignment of a quoted literal to something named password.
    static ref PASSWORD_PATTERN: Regex =
        Regex::new(r#"(?i)password\s*=\s*["'`][^"'`]*["'`]"#).unwrap();

    /// `var` as a whole word (JavaScript declaration keyword).
    static ref VAR_PATTERN: Regex = Regex::new(r"\bvar\b").unwrap();
}

fn synthetic(
    title: &str,
    description: &str,
    severity: Severity,
    rule: &str,
    recommendation: &str,
) -> Finding {
    Finding {
        id: ident::generate(),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        line_start: 1,
        line_end: 1,
        rule: rule.to_string(),
        recommendation: recommendation.to_string(),
    }
}

/// Analyze a snippet locally. Pure apart from generated identifiers.
///
/// A snippet that trips no check (empty and whitespace-only input
/// included) produces a single "no issues detected" finding so the caller
/// always has something to render.
pub fn analyze(snippet: &str, language: &str) -> AnalysisResponse {
    let trimmed = snippet.trim();
    let mut findings = Vec::new();

    if trimmed.to_lowercase().contains("todo") {
        findings.push(synthetic(
            "TODO comment left in code",
            "The snippet contains a TODO marker, which usually indicates unfinished work.",
            Severity::Info,
            "style/todo-comment",
            "Resolve the TODO or track it in your issue tracker before shipping.",
        ));
    }

    if EVAL_PATTERN.is_match(trimmed) {
        findings.push(synthetic(
            "Use of eval()",
            "Calling eval() executes arbitrary strings as code and is a common injection vector.",
            Severity::High,
            "security/no-eval",
            "Replace eval() with a safe alternative such as JSON parsing or a dispatch table.",
        ));
    }

    if PASSWORD_PATTERN.is_match(trimmed) {
        findings.push(synthetic(
            "Hardcoded password",
            "A password appears to be assigned as a string literal in the snippet.",
            Severity::Critical,
            "security/hardcoded-password",
            "Move the credential to a secret store or environment configuration and rotate it.",
        ));
    }

    if language.to_lowercase().contains("js") && VAR_PATTERN.is_match(trimmed) {
        findings.push(synthetic(
            "Legacy var declaration",
            "The snippet declares variables with `var`, which has function-scoped hoisting.",
            Severity::Low,
            "style/no-var",
            "Prefer `let` or `const` for block-scoped declarations.",
        ));
    }

    if findings.is_empty() {
        findings.push(synthetic(
            "No issues detected",
            "The demo heuristics found nothing noteworthy in this snippet.",
            Severity::Info,
            "general/clean",
            "No action needed.",
        ));
    }

    AnalysisResponse::from_findings(findings)
}
