// src/analyze/links.rs
// =============================================================================
// Analyzer writing the `urls` field: extract every link, then probe them all.
// =============================================================================

use super::result::{AnalysisError, Contribution};
use super::{Analyzer, CancellationToken, Document, Stage};
use crate::checker::{extract_html_links, LinkChecker};
use futures::future::{BoxFuture, FutureExt};
use std::time::Instant;

pub struct LinkAnalyzer {
    checker: LinkChecker,
}

impl LinkAnalyzer {
    pub fn new(checker: LinkChecker) -> Self {
        Self { checker }
    }
}

impl Analyzer for LinkAnalyzer {
    fn stage(&self) -> Stage {
        Stage::Links
    }

    fn analyze<'a>(
        &'a self,
        document: &'a Document,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
        async move {
            ::log::debug!("Starting analysis of links on {}", document.url());
            let started = Instant::now();

            // The parsed tree is dropped inside extract_html_links,
            // before the first await
            let links = extract_html_links(document.content(), document.base_origin());
            ::log::debug!("Found {} link(s)", links.len());

            let records = self
                .checker
                .check_links(links, document.base_origin(), cancel)
                .await;

            ::log::debug!(
                "Completed link analysis in {} ms",
                started.elapsed().as_millis()
            );
            Ok(Contribution::Links(records))
        }
        .boxed()
    }
}
