//! Analyze facade: the single entry point for callers.

use tracing::debug;

use crate::config::Config;
use crate::demo;
use crate::finding::AnalysisResponse;
use crate::remote::RemoteClient;

/// Routes analysis requests to the demo analyzer or the remote service
/// based on the configuration snapshot taken at construction.
pub struct Analyzer {
    config: Config,
    client: RemoteClient,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: RemoteClient::new(),
        }
    }

    /// Inject a pre-built client (tests use one with a short timeout).
    pub fn with_client(config: Config, client: RemoteClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze a snippet. Never panics or errors; all failure is captured
    /// in the response's `error` field. The demo path completes without
    /// suspending.
    pub async fn analyze(&self, snippet: &str, language: &str) -> AnalysisResponse {
        match self.config.api_base.as_deref() {
            None => {
                debug!(language, "analyzing with demo heuristics");
                demo::analyze(snippet, language)
            }
            Some(api_base) => {
                debug!(language, api_base, "delegating to remote service");
                self.client.analyze(api_base, snippet, language).await
            }
        }
    }
}
