// src/fetch/page.rs
// =============================================================================
// Fetches a web page and wraps it in a Document.
//
// What can go wrong (each one ends the request before any analysis):
// - The URL is empty
// - The URL is not an http(s) URL
// - The request fails (DNS, refused connection, timeout, TLS...)
// - The body cannot be read
//
// A non-2xx status is NOT an error here: error pages are still HTML and
// still get analyzed. We only log a warning for them.
// =============================================================================

use crate::analyze::{AnalysisError, Document, Stage};
use reqwest::Client;
use url::Url;

// Fetches a web page and returns it as a Document
//
// Parameters:
//   client: the shared HTTP client
//   url: the page to fetch, as typed by the user
//
// Returns: the Document, or an AnalysisError with stage = Fetch
pub async fn fetch_page(client: &Client, url: &str) -> Result<Document, AnalysisError> {
    let url = url.trim();
    if url.is_empty() {
        ::log::warn!("No URL given for analysis");
        return Err(fetch_error("No URL to analyze", None));
    }

    let parsed = Url::parse(url)
        .map_err(|e| fetch_error("Invalid web page url", Some(e.to_string())))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(fetch_error(
            "Invalid web page url",
            Some(format!("unsupported scheme '{}'", parsed.scheme())),
        ));
    }

    let response = client.get(parsed.as_str()).send().await.map_err(|e| {
        ::log::warn!("Error occurred while calling web page url {}: {}", url, e);
        fetch_error("Error occurred while calling web page url", Some(e.to_string()))
    })?;

    let status = response.status();
    if !status.is_success() {
        ::log::warn!("Web page {} answered with HTTP {}", url, status.as_u16());
    }

    let body = response.text().await.map_err(|e| {
        ::log::warn!("Error occurred while reading body of {}: {}", url, e);
        fetch_error("Error occurred while reading body", Some(e.to_string()))
    })?;

    ::log::debug!("Fetched {} bytes from {}", body.len(), url);
    Document::new(url, body)
}

fn fetch_error(message: &str, detail: Option<String>) -> AnalysisError {
    AnalysisError::bad_request(Stage::Fetch, message, detail)
}
