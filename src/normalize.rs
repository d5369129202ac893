//! Normalization of loosely-typed upstream payloads.
//!
//! Remote analysis services disagree on field names: findings may arrive
//! under `findings`, `issues`, or `results`, severities under `severity` or
//! `level`, locations under `lineStart`/`line` and `lineEnd`/`endLine`.
//! Decoding happens in two explicit steps: first classify the payload into
//! one of the known shapes, then map each raw finding into the canonical
//! [`Finding`]. Anything unusable degrades to a documented default rather
//! than an error.

use serde_json::Value;
use tracing::debug;

use crate::finding::{
    summarize, AnalysisResponse, ErrorInfo, Finding, Severity, SeverityCounts, Summary,
};
use crate::ident;

/// Error message for an absent or null payload.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Empty response received from server";
/// Machine code for an absent or null payload.
pub const EMPTY_RESPONSE_CODE: &str = "EMPTY_RESPONSE";

/// Recommendation used when the upstream finding carries none.
const DEFAULT_RECOMMENDATION: &str =
    "Review the flagged code and apply the appropriate fix for your codebase.";

/// Alternate keys probed for a findings array, in priority order.
const ALTERNATE_KEYS: [&str; 3] = ["issues", "results", "findings"];

/// Classified upstream payload shape.
enum PayloadShape<'a> {
    /// Canonical: a `findings` array, optionally with a `summary` object.
    Canonical {
        findings: &'a [Value],
        summary: Option<&'a Value>,
    },
    /// An alternate key held the findings array; summary is recomputed.
    Alternate { findings: &'a [Value] },
    /// No findings-like array anywhere in the payload.
    Bare,
}

/// Convert an arbitrary upstream payload into a well-formed response.
///
/// `None` or JSON null produces an `EMPTY_RESPONSE` error result; every
/// other input produces findings (possibly empty) without an error.
pub fn normalize(payload: Option<&Value>) -> AnalysisResponse {
    let payload = match payload {
        Some(value) if !value.is_null() => value,
        _ => {
            return AnalysisResponse::from_error(ErrorInfo::new(
                EMPTY_RESPONSE_MESSAGE,
                EMPTY_RESPONSE_CODE,
            ))
        }
    };

    match classify(payload) {
        PayloadShape::Canonical { findings, summary } => {
            let mapped: Vec<Finding> = findings.iter().map(map_finding).collect();
            let summary = match summary.filter(|s| s.is_object()) {
                Some(value) => coerce_summary(value, mapped.len()),
                None => summarize(&mapped),
            };
            AnalysisResponse {
                findings: mapped,
                summary,
                error: None,
            }
        }
        PayloadShape::Alternate { findings } => {
            debug!(count = findings.len(), "findings found under alternate key");
            let mapped: Vec<Finding> = findings.iter().map(map_finding).collect();
            AnalysisResponse::from_findings(mapped)
        }
        PayloadShape::Bare => {
            debug!("payload carried no findings array");
            AnalysisResponse::from_findings(Vec::new())
        }
    }
}

/// Classify the payload into one of the known shapes.
fn classify(payload: &Value) -> PayloadShape<'_> {
    if let Some(findings) = payload.get("findings").and_then(Value::as_array) {
        return PayloadShape::Canonical {
            findings,
            summary: payload.get("summary"),
        };
    }

    for key in ALTERNATE_KEYS {
        if let Some(findings) = payload.get(key).and_then(Value::as_array) {
            return PayloadShape::Alternate { findings };
        }
    }

    PayloadShape::Bare
}

/// Map one raw upstream finding into the canonical shape.
fn map_finding(raw: &Value) -> Finding {
    let severity = first_string(raw, &["severity", "level"])
        .map(|s| s.to_lowercase())
        .and_then(|s| s.parse::<Severity>().ok())
        .unwrap_or(Severity::Info);

    let line_start = match first_number(raw, &["lineStart", "line"]) {
        Some(n) if n.is_finite() && n >= 1.0 => n as u32,
        _ => 1,
    };
    let line_end = match first_number(raw, &["lineEnd", "endLine"]) {
        Some(n) if n.is_finite() && n >= line_start as f64 => n as u32,
        _ => line_start,
    };

    let id = first_string(raw, &["id", "ruleId", "rule"])
        .unwrap_or_else(ident::generate);
    let title =
        first_string(raw, &["title", "message"]).unwrap_or_else(|| "Finding".to_string());
    let description =
        first_string(raw, &["description", "detail", "message"]).unwrap_or_default();
    let rule = first_string(raw, &["rule", "ruleId"]).unwrap_or_else(|| "N/A".to_string());
    let recommendation = first_string(raw, &["recommendation", "suggestion"])
        .unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string());

    Finding {
        id,
        title,
        description,
        severity,
        line_start,
        line_end,
        rule,
        recommendation,
    }
}

/// Build a summary from an upstream summary object, trusting its counts.
///
/// Each field is numerically coerced; a missing `total` defaults to the
/// mapped finding count and missing severity counts default to 0.
fn coerce_summary(value: &Value, finding_count: usize) -> Summary {
    let total = coerce_number(value.get("total"))
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
        .unwrap_or(finding_count as u64);

    let counts = value.get("bySeverity");
    let count_for = |key: &str| -> u64 {
        coerce_number(counts.and_then(|c| c.get(key)))
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64)
            .unwrap_or(0)
    };

    Summary {
        total,
        by_severity: SeverityCounts {
            info: count_for("info"),
            low: count_for("low"),
            medium: count_for("medium"),
            high: count_for("high"),
            critical: count_for("critical"),
        },
    }
}

/// First present key rendered as a string. Numbers are stringified so a
/// numeric `id` still becomes a usable identifier.
fn first_string(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match raw.get(key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// First present key coerced to a number. Accepts JSON numbers and
/// numeric strings.
fn first_number(raw: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match raw.get(key) {
            Some(Value::Number(n)) => return n.as_f64(),
            Some(Value::String(s)) => return s.trim().parse::<f64>().ok(),
            Some(_) => return None,
            None => {}
        }
    }
    None
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_none_is_empty_response_error() {
        let response = normalize(None);
        assert!(response.findings.is_empty());
        assert_eq!(response.summary, Summary::default());
        let error = response.error.unwrap();
        assert_eq!(error.message, EMPTY_RESPONSE_MESSAGE);
        assert_eq!(error.code.as_deref(), Some(EMPTY_RESPONSE_CODE));
    }

    #[test]
    fn test_normalize_null_is_empty_response_error() {
        let response = normalize(Some(&Value::Null));
        assert!(response.error.is_some());
    }

    #[test]
    fn test_canonical_findings_mapped() {
        let payload = json!({
            "findings": [{
                "id": "F1",
                "title": "Unsafe call",
                "description": "Something unsafe",
                "severity": "high",
                "lineStart": 3,
                "lineEnd": 7,
                "rule": "security/unsafe",
                "recommendation": "Remove it"
            }]
        });
        let response = normalize(Some(&payload));
        assert!(response.error.is_none());
        assert_eq!(response.findings.len(), 1);
        let f = &response.findings[0];
        assert_eq!(f.id, "F1");
        assert_eq!(f.severity, Severity::High);
        assert_eq!(f.line_start, 3);
        assert_eq!(f.line_end, 7);
        assert_eq!(response.summary.total, 1);
        assert_eq!(response.summary.by_severity.high, 1);
    }

    #[test]
    fn test_invalid_severity_downgrades_to_info() {
        let payload = json!({"findings": [{"severity": "WARN"}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_level_field_used_as_severity() {
        let payload = json!({"findings": [{"level": "CRITICAL"}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_missing_line_end_clamps_to_line_start() {
        let payload = json!({"findings": [{"lineStart": 5}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].line_start, 5);
        assert_eq!(response.findings[0].line_end, 5);
    }

    #[test]
    fn test_line_end_below_line_start_clamps() {
        let payload = json!({"findings": [{"line": 10, "endLine": 4}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].line_start, 10);
        assert_eq!(response.findings[0].line_end, 10);
    }

    #[test]
    fn test_non_finite_lines_default_to_one() {
        let payload = json!({"findings": [{"lineStart": "not a number"}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].line_start, 1);
        assert_eq!(response.findings[0].line_end, 1);
    }

    #[test]
    fn test_numeric_string_lines_coerced() {
        let payload = json!({"findings": [{"line": "12", "endLine": "14"}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].line_start, 12);
        assert_eq!(response.findings[0].line_end, 14);
    }

    #[test]
    fn test_field_defaults() {
        let payload = json!({"findings": [{}]});
        let response = normalize(Some(&payload));
        let f = &response.findings[0];
        assert!(f.id.starts_with("finding-"));
        assert_eq!(f.title, "Finding");
        assert_eq!(f.description, "");
        assert_eq!(f.rule, "N/A");
        assert_eq!(f.recommendation, DEFAULT_RECOMMENDATION);
        assert_eq!(f.severity, Severity::Info);
    }

    #[test]
    fn test_message_feeds_title_and_description() {
        let payload = json!({"findings": [{"message": "Loop never terminates"}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].title, "Loop never terminates");
        assert_eq!(response.findings[0].description, "Loop never terminates");
    }

    #[test]
    fn test_rule_id_feeds_id_and_rule() {
        let payload = json!({"findings": [{"ruleId": "bug/infinite-loop"}]});
        let response = normalize(Some(&payload));
        assert_eq!(response.findings[0].id, "bug/infinite-loop");
        assert_eq!(response.findings[0].rule, "bug/infinite-loop");
    }

    #[test]
    fn test_well_formed_summary_trusted() {
        let payload = json!({
            "findings": [{"severity": "low"}],
            "summary": {"total": "9", "bySeverity": {"high": 4, "low": "2"}}
        });
        let response = normalize(Some(&payload));
        // Trusted as given, not recomputed from the single mapped finding.
        assert_eq!(response.summary.total, 9);
        assert_eq!(response.summary.by_severity.high, 4);
        assert_eq!(response.summary.by_severity.low, 2);
        assert_eq!(response.summary.by_severity.info, 0);
    }

    #[test]
    fn test_malformed_summary_recomputed() {
        let payload = json!({
            "findings": [{"severity": "medium"}],
            "summary": "not an object"
        });
        let response = normalize(Some(&payload));
        assert_eq!(response.summary.total, 1);
        assert_eq!(response.summary.by_severity.medium, 1);
    }

    #[test]
    fn test_summary_missing_total_defaults_to_finding_count() {
        let payload = json!({
            "findings": [{"severity": "low"}, {"severity": "low"}],
            "summary": {"bySeverity": {"low": 2}}
        });
        let response = normalize(Some(&payload));
        assert_eq!(response.summary.total, 2);
    }

    #[test]
    fn test_issues_key_probed_first() {
        let payload = json!({
            "issues": [{"severity": "high"}],
            "results": [{"severity": "low"}]
        });
        let response = normalize(Some(&payload));
        assert_eq!(response.findings.len(), 1);
        assert_eq!(response.findings[0].severity, Severity::High);
        assert_eq!(response.summary.by_severity.high, 1);
    }

    #[test]
    fn test_alternate_key_always_recomputes_summary() {
        let payload = json!({
            "results": [{"severity": "low"}],
            "summary": {"total": 99}
        });
        let response = normalize(Some(&payload));
        assert_eq!(response.summary.total, 1);
    }

    #[test]
    fn test_bare_payload_yields_empty_findings_no_error() {
        let payload = json!({"raw": "OK"});
        let response = normalize(Some(&payload));
        assert!(response.error.is_none());
        assert!(response.findings.is_empty());
        assert_eq!(response.summary.total, 0);
    }

    #[test]
    fn test_order_preserved_no_dedup() {
        let payload = json!({
            "findings": [
                {"id": "a", "severity": "low"},
                {"id": "a", "severity": "low"},
                {"id": "b", "severity": "high"}
            ]
        });
        let response = normalize(Some(&payload));
        let ids: Vec<&str> = response.findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "b"]);
    }
}
