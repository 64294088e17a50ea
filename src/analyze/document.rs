// src/analyze/document.rs
// =============================================================================
// The fetched page every analyzer reads.
//
// A Document is built once per request and never changes afterwards. The
// orchestrator wraps it in an Arc so every analyzer task can read it at the
// same time without copying the HTML.
// =============================================================================

use super::result::{AnalysisError, Stage};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: Url,
    base_origin: String,
    content: String,
}

impl Document {
    /// Builds a document from the page URL and its HTML.
    ///
    /// Fails when the URL cannot be parsed or has no host, since the base
    /// origin is needed for link resolution.
    pub fn new(url: &str, content: impl Into<String>) -> Result<Self, AnalysisError> {
        let url = Url::parse(url).map_err(|e| {
            AnalysisError::bad_request(Stage::Fetch, "Invalid web page url", Some(e.to_string()))
        })?;
        let base_origin = base_origin(&url).ok_or_else(|| {
            AnalysisError::bad_request(
                Stage::Fetch,
                "Invalid web page url",
                Some(format!("URL has no host: {}", url)),
            )
        })?;

        Ok(Self {
            url,
            base_origin,
            content: content.into(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// scheme://host[:port], e.g. "http://example.com"
    pub fn base_origin(&self) -> &str {
        &self.base_origin
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// scheme://host[:port] of a URL, None for URLs without a host (mailto:, data:)
pub fn base_origin(url: &Url) -> Option<String> {
    if !url.has_host() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}
