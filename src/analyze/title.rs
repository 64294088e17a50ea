// src/analyze/title.rs
// =============================================================================
// Extracts the page title: the text right after the first <title> start tag.
//
// An empty document is treated as undecodable and fails the whole request.
// A document that simply has no <title> is fine; the title stays empty.
// =============================================================================

use super::result::{AnalysisError, Contribution};
use super::tokens::{tokenize, HtmlToken};
use super::{Analyzer, CancellationToken, Document, Stage};
use futures::future::{self, BoxFuture, FutureExt};
use std::time::Instant;

/// Finds the title text in an HTML document.
///
/// Errors only when there is no HTML at all to look at.
pub fn extract_title(html: &str) -> Result<Option<String>, AnalysisError> {
    if html.trim().is_empty() {
        return Err(AnalysisError::bad_request(
            Stage::Title,
            "Failed to decode HTML while analyzing title",
            Some("document is empty".to_string()),
        ));
    }

    let mut tokens = tokenize(html).into_iter();
    while let Some(token) = tokens.next() {
        if matches!(&token, HtmlToken::StartTag { name, .. } if name == "title") {
            // <title></title> yields an end tag here, keep looking
            if let Some(HtmlToken::Text(text)) = tokens.next() {
                return Ok(Some(text.trim().to_string()));
            }
        }
    }

    Ok(None)
}

/// Analyzer writing the `title` field
#[derive(Debug, Default)]
pub struct TitleAnalyzer;

impl Analyzer for TitleAnalyzer {
    fn stage(&self) -> Stage {
        Stage::Title
    }

    fn analyze<'a>(
        &'a self,
        document: &'a Document,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
        let started = Instant::now();
        let outcome = extract_title(document.content()).map(Contribution::Title);

        match &outcome {
            Ok(_) => ::log::debug!("Title analyzer completed in {} ms", started.elapsed().as_millis()),
            Err(e) => ::log::debug!("Title analyzer failed: {}", e),
        }
        future::ready(outcome).boxed()
    }
}
