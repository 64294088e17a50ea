// src/config.rs
// =============================================================================
// Runtime configuration and the shared HTTP client.
//
// Values are layered, later layers win:
// 1. Built-in defaults
// 2. An optional JSON file (--config <path>)
// 3. CLI flags / environment variables (see cli::ClientArgs)
//
// The same reqwest Client is used to fetch the page and to probe every link,
// so its connection pool is shared across the whole run.
// =============================================================================

use crate::cli::ClientArgs;
use anyhow::{Context, Result};
use reqwest::{redirect, Client};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-request timeout, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How many redirects a single request may follow
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("page-inspector/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Loads a JSON config file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Builds the effective configuration for one CLI invocation
    pub fn load(args: &ClientArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        ::log::debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &ClientArgs) {
        if let Some(timeout_ms) = args.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(max_redirects) = args.max_redirects {
            self.max_redirects = max_redirects;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout())
            .redirect(redirect::Policy::limited(self.max_redirects))
            .user_agent(self.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")
    }
}
