//! Remote analysis client.
//!
//! Submits `{snippet, language}` to `{api_base}/analyze` with a hard
//! per-call time bound and maps every failure mode into the error taxonomy:
//! `NETWORK_ERROR`, `TIMEOUT`, or `HTTP_<status>`. Successful payloads are
//! handed to the normalizer, so a response from this client is always a
//! well-formed [`AnalysisResponse`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::finding::{AnalysisResponse, ErrorInfo};
use crate::normalize::normalize;

/// Total request bound. The in-flight call is aborted once this elapses.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(15_000);

/// How much of the underlying error chain is surfaced in diagnostics.
const MAX_CHAIN_ENTRIES: usize = 3;

/// Request body for the analyze endpoint.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    snippet: &'a str,
    language: &'a str,
}

/// Failure modes of a remote analysis call.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}")]
    Http { status: u16, details: Option<Value> },
}

impl RemoteError {
    /// Convert into the error descriptor surfaced to callers.
    pub fn into_info(self) -> ErrorInfo {
        match self {
            RemoteError::Network(err) => ErrorInfo {
                message: "Network error occurred while contacting the analysis service."
                    .to_string(),
                status: None,
                code: Some("NETWORK_ERROR".to_string()),
                details: Some(redacted_details(err)),
            },
            RemoteError::Timeout => ErrorInfo {
                message: "Request timed out. Please try again.".to_string(),
                status: None,
                code: Some("TIMEOUT".to_string()),
                details: None,
            },
            RemoteError::Http { status, details } => ErrorInfo {
                message: http_status_message(status),
                status: Some(status),
                code: Some(format!("HTTP_{}", status)),
                details,
            },
        }
    }
}

/// Fixed human-readable message for a non-success HTTP status.
fn http_status_message(status: u16) -> String {
    match status {
        400 => "Invalid request sent to the analysis service.".to_string(),
        401 => "Unauthorized. Check your analysis service credentials.".to_string(),
        403 => "Access to the analysis service is forbidden.".to_string(),
        404 => "Analysis endpoint not found.".to_string(),
        408 => "Request timed out. Please try again.".to_string(),
        500..=599 => "The analysis service encountered a server error.".to_string(),
        other => format!("Unexpected error (HTTP {}).", other),
    }
}

/// Diagnostic object attached to network errors. Limited to the error name,
/// message, and the first few entries of its source chain so transport
/// internals never reach the presentation layer.
fn redacted_details(err: reqwest::Error) -> Value {
    let mut chain = Vec::new();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        if chain.len() == MAX_CHAIN_ENTRIES {
            break;
        }
        chain.push(cause.to_string());
        source = cause.source();
    }

    json!({
        "name": "reqwest::Error",
        "message": err.without_url().to_string(),
        "chain": chain,
    })
}

/// HTTP client for the remote analysis service.
pub struct RemoteClient {
    http: Client,
    timeout: Duration,
}

impl Default for RemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteClient {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create a client with a non-default bound. Used by tests; production
    /// callers stick with [`REQUEST_TIMEOUT`].
    pub fn with_timeout(timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent(concat!("snipcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");
        Self { http, timeout }
    }

    /// Analyze a snippet against the configured backend. Never returns an
    /// Err to the caller; all failures land in the response's `error` field.
    pub async fn analyze(
        &self,
        api_base: &str,
        snippet: &str,
        language: &str,
    ) -> AnalysisResponse {
        match self.call(api_base, snippet, language).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "remote analysis failed");
                AnalysisResponse::from_error(err.into_info())
            }
        }
    }

    async fn call(
        &self,
        api_base: &str,
        snippet: &str,
        language: &str,
    ) -> Result<AnalysisResponse, RemoteError> {
        let url = format!("{}/analyze", api_base);
        debug!(%url, language, "dispatching analysis request");

        let response = self
            .http
            .post(&url)
            .json(&AnalyzeRequest { snippet, language })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout
                } else {
                    RemoteError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Best effort: a structured or text error body becomes details;
            // failure to read or parse it is swallowed.
            let details = match response.text().await {
                Ok(text) if !text.is_empty() => Some(
                    serde_json::from_str::<Value>(&text)
                        .unwrap_or_else(|_| Value::String(text)),
                ),
                _ => None,
            };
            return Err(RemoteError::Http {
                status: status.as_u16(),
                details,
            });
        }

        let declares_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json"))
            .unwrap_or(false);

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout
            } else {
                RemoteError::Network(e)
            }
        })?;

        let payload = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
            if declares_json {
                debug!("declared-JSON body failed to parse; treating as raw text");
            }
            json!({ "findings": [], "raw": text })
        });

        Ok(normalize(Some(&payload)))
    }
}
