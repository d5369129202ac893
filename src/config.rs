//! Process configuration resolved once from the environment.
//!
//! Two variables are consulted: `SNIPCHECK_API_URL` (primary) and
//! `ANALYSIS_API_URL` (fallback). When neither yields a non-empty value the
//! process runs in demo mode and never touches the network. The resolved
//! value is passed to dependents explicitly so the core stays testable
//! without mutating the process environment.

use serde::{Deserialize, Serialize};

/// Primary base-URL environment variable.
pub const PRIMARY_ENV_VAR: &str = "SNIPCHECK_API_URL";
/// Fallback base-URL environment variable.
pub const FALLBACK_ENV_VAR: &str = "ANALYSIS_API_URL";

/// Operating mode, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Demo,
    Connected,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Demo => write!(f, "demo"),
            Mode::Connected => write!(f, "connected"),
        }
    }
}

/// Immutable configuration descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Normalized base URL with no trailing slash. `None` in demo mode.
    pub api_base: Option<String>,
    pub mode: Mode,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn resolve() -> Self {
        Self::from_values(
            std::env::var(PRIMARY_ENV_VAR).ok(),
            std::env::var(FALLBACK_ENV_VAR).ok(),
        )
    }

    /// Pure resolution core: prefer a non-empty primary, else fallback.
    ///
    /// No URL validation happens here; a malformed value is passed through
    /// and fails at the network call.
    pub fn from_values(primary: Option<String>, fallback: Option<String>) -> Self {
        let pick = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base = pick(primary).or_else(|| pick(fallback)).map(|v| {
            v.trim_end_matches('/').to_string()
        });

        match base {
            Some(base) if !base.is_empty() => Config {
                api_base: Some(base),
                mode: Mode::Connected,
            },
            _ => Config {
                api_base: None,
                mode: Mode::Demo,
            },
        }
    }

    pub fn is_demo(&self) -> bool {
        self.mode == Mode::Demo
    }
}
