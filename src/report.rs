//! Output formatting for analysis results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the canonical response shape for programmatic consumption

use colored::*;

use crate::config::Mode;
use crate::finding::{AnalysisResponse, Severity, ALL_SEVERITIES};

/// Write a response as pretty-printed JSON to stdout.
pub fn write_json(response: &AnalysisResponse) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(response)?;
    println!("{}", json);
    Ok(())
}

/// Write a response in human-readable form to stdout.
pub fn write_pretty(response: &AnalysisResponse, language: &str, mode: Mode) {
    // Header
    println!();
    print!("  ");
    print!("{}", "snipcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Language: ".dimmed());
    println!("{}", language);
    print!("  {}", "Mode:     ".dimmed());
    println!("{}", mode);
    println!();

    if let Some(error) = &response.error {
        print!("  {} ", "✗ ERROR".red().bold());
        println!("{}", error.message);
        if let Some(code) = &error.code {
            println!("          {}", format!("code: {}", code).dimmed());
        }
        if let Some(status) = error.status {
            println!("          {}", format!("status: {}", status).dimmed());
        }
        println!();
        return;
    }

    write_summary_line(response);
    println!();

    if !response.findings.is_empty() {
        write_findings(response);
    }
}

fn write_summary_line(response: &AnalysisResponse) {
    print!(
        "  {} ({} total)",
        "Findings".bold(),
        response.summary.total
    );

    let parts: Vec<String> = ALL_SEVERITIES
        .iter()
        .rev()
        .filter_map(|&severity| {
            let count = response.summary.by_severity.get(severity);
            (count > 0).then(|| format!("{} {}", count, severity))
        })
        .collect();

    if !parts.is_empty() {
        print!("  {}", parts.join(", ").dimmed());
    }
    println!();
}

fn write_findings(response: &AnalysisResponse) {
    for f in &response.findings {
        write_severity_tag(f.severity);
        print!("{:<28}", f.rule.dimmed());
        print!("{}", f.title.bold());
        if f.line_start > 1 || f.line_end > f.line_start {
            print!("{}", format!("  L{}-{}", f.line_start, f.line_end).dimmed());
        }
        println!();

        if !f.description.is_empty() {
            println!("           {}", f.description);
        }
        println!("           {}", format!("fix: {}", f.recommendation).dimmed());
        println!();
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Critical => print!("    {} ", "CRIT ".red().bold()),
        Severity::High => print!("    {} ", "HIGH ".red()),
        Severity::Medium => print!("    {} ", "MED  ".yellow()),
        Severity::Low => print!("    {} ", "LOW  ".yellow().dimmed()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}
