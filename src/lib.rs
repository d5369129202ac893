//! Snipcheck - snippet analysis client.
//!
//! Snipcheck takes a source-code snippet plus a language tag and returns a
//! normalized set of findings (potential bug, style, and security issues)
//! with severities and recommendations. It operates in two modes, derived
//! once from the environment and fixed for the process lifetime:
//!
//! - **connected**: requests are delegated to a remote analysis service
//! - **demo**: findings come from local heuristics, no network involved
//!
//! # Architecture
//!
//! - `config`: environment resolution into an immutable mode descriptor
//! - `finding`: result data model and severity summarizer
//! - `normalize`: loosely-typed upstream payloads → canonical shape
//! - `demo`: local heuristic analyzer
//! - `remote`: HTTP client with timeout and error taxonomy
//! - `analyze`: the facade that routes between the two paths
//! - `report`: output formatting (pretty, JSON)

pub mod analyze;
pub mod cli;
pub mod config;
pub mod demo;
pub mod finding;
pub mod ident;
pub mod normalize;
pub mod remote;
pub mod report;

pub use analyze::Analyzer;
pub use config::{Config, Mode};
pub use finding::{summarize, AnalysisResponse, ErrorInfo, Finding, Severity, Summary};
pub use normalize::normalize;
pub use remote::{RemoteClient, RemoteError, REQUEST_TIMEOUT};
