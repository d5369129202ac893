//! Core types for analysis results.

use serde::{Deserialize, Serialize};

/// Severity levels for findings, ordered least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// All severities in display order.
pub const ALL_SEVERITIES: [Severity; 5] = [
    Severity::Info,
    Severity::Low,
    Severity::Medium,
    Severity::High,
    Severity::Critical,
];

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// A single reported issue.
///
/// `line_end >= line_start` always holds; both default to 1 when the
/// upstream payload carries no usable location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Unique within a single response. Generated when the upstream
    /// payload provides none; not unique across processes.
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub line_start: u32,
    pub line_end: u32,
    pub rule: String,
    pub recommendation: String,
}

/// Finding counts per severity. Every severity is present, unseen ones at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub info: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub critical: u64,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Info => self.info,
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn sum(&self) -> u64 {
        self.info + self.low + self.medium + self.high + self.critical
    }
}

/// Summary of a set of findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u64,
    #[serde(rename = "bySeverity")]
    pub by_severity: SeverityCounts,
}

/// Error descriptor attached to a failed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: Some(code.into()),
            details: None,
        }
    }
}

/// The result shape returned to callers. Always well-formed: when `error`
/// is set, `findings` is empty and `summary` is all-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub findings: Vec<Finding>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl AnalysisResponse {
    /// Build a response from findings, computing the summary.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let summary = summarize(&findings);
        Self {
            findings,
            summary,
            error: None,
        }
    }

    /// Build an error response with empty findings and a zero summary.
    pub fn from_error(error: ErrorInfo) -> Self {
        Self {
            findings: Vec::new(),
            summary: Summary::default(),
            error: Some(error),
        }
    }

    /// Whether any finding is at or above the given severity.
    pub fn has_severity_at_least(&self, threshold: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= threshold)
    }
}

/// Count findings per severity. `total` always equals `findings.len()`.
pub fn summarize(findings: &[Finding]) -> Summary {
    let mut by_severity = SeverityCounts::default();
    for finding in findings {
        by_severity.increment(finding.severity);
    }
    Summary {
        total: findings.len() as u64,
        by_severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> Finding {
        Finding {
            id: "f-1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            severity,
            line_start: 1,
            line_end: 1,
            rule: "N/A".to_string(),
            recommendation: "r".to_string(),
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_round_trip() {
        for severity in ALL_SEVERITIES {
            let parsed: Severity = severity.as_str().parse().unwrap();
            assert_eq!(parsed, severity);
        }
        assert!("warn".parse::<Severity>().is_err());
    }

    #[test]
    fn test_summarize_counts_match_total() {
        let findings = vec![
            finding(Severity::Info),
            finding(Severity::High),
            finding(Severity::High),
            finding(Severity::Critical),
        ];
        let summary = summarize(&findings);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_severity.sum(), summary.total);
        assert_eq!(summary.by_severity.high, 2);
        assert_eq!(summary.by_severity.medium, 0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.by_severity, SeverityCounts::default());
    }

    #[test]
    fn test_error_response_invariant() {
        let response =
            AnalysisResponse::from_error(ErrorInfo::new("boom", "NETWORK_ERROR"));
        assert!(response.findings.is_empty());
        assert_eq!(response.summary.total, 0);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_finding_wire_names() {
        let json = serde_json::to_value(finding(Severity::Low)).unwrap();
        assert!(json.get("lineStart").is_some());
        assert!(json.get("lineEnd").is_some());
        assert_eq!(json["severity"], "low");
    }
}
