//! Command-line interface for snipcheck.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::analyze::Analyzer;
use crate::config::Config;
use crate::finding::Severity;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Analyze code snippets for potential bugs, style, and security issues.
///
/// With SNIPCHECK_API_URL (or ANALYSIS_API_URL) set, snippets are submitted
/// to the configured remote analysis service. Without either, snipcheck
/// runs in demo mode and applies local heuristics only.
#[derive(Parser)]
#[command(name = "snipcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a snippet from a file (or stdin with "-")
    #[command(visible_alias = "scan")]
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// File containing the snippet, or "-" to read from stdin
    pub path: PathBuf,

    /// Language tag (default: inferred from the file extension)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Exit non-zero when a finding at or above this severity is present
    #[arg(long, value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,
}

/// Map a file extension to a language tag.
fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "js" | "mjs" | "cjs" => Some("js"),
        "jsx" => Some("jsx"),
        "ts" => Some("ts"),
        "tsx" => Some("tsx"),
        "py" => Some("python"),
        "rs" => Some("rust"),
        "go" => Some("go"),
        "java" => Some("java"),
        "rb" => Some("ruby"),
        "c" | "h" => Some("c"),
        "cpp" | "cc" | "hpp" => Some("cpp"),
        _ => None,
    }
}

/// Resolve the language tag: explicit flag first, then file extension.
fn resolve_language(args: &AnalyzeArgs) -> String {
    if let Some(lang) = &args.language {
        return lang.clone();
    }
    args.path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(language_for_extension)
        .unwrap_or("plain")
        .to_string()
}

/// Read the snippet from the given path, or stdin when the path is "-".
fn read_snippet(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Run the analyze command, resolving configuration from the environment.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Configuration is resolved once and fixed for the process lifetime.
    run_analyze_with(args, Config::resolve())
}

/// Run the analyze command against an explicit configuration. Tests use
/// this directly so they never depend on process environment state.
pub fn run_analyze_with(args: &AnalyzeArgs, config: Config) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let snippet = match read_snippet(&args.path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot read {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let language = resolve_language(args);

    let mode = config.mode;
    let analyzer = Analyzer::new(config);

    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(analyzer.analyze(&snippet, &language));

    match args.format.as_str() {
        "json" => report::write_json(&response)?,
        _ => report::write_pretty(&response, &language, mode),
    }

    if response.error.is_some() {
        return Ok(EXIT_FAILED);
    }
    if let Some(threshold) = args.fail_on {
        if response.has_severity_at_least(threshold) {
            return Ok(EXIT_FAILED);
        }
    }
    Ok(EXIT_SUCCESS)
}
