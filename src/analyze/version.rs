// src/analyze/version.rs
// =============================================================================
// Detects the declared HTML version from the DOCTYPE.
//
// This is a plain case-insensitive substring search. The DTD public
// identifiers are checked first; the bare HTML 5 doctype comes last because
// older doctypes also start with "<!DOCTYPE html".
// =============================================================================

use super::result::{AnalysisError, Contribution};
use super::{Analyzer, CancellationToken, Document, Stage};
use futures::future::{self, BoxFuture, FutureExt};

// (version name, marker to look for), most specific first
const DOCTYPE_MARKERS: &[(&str, &str)] = &[
    ("HTML 4.01 Transitional", r#""-//W3C//DTD HTML 4.01 Transitional//EN""#),
    ("HTML 4.01 Frameset", r#""-//W3C//DTD HTML 4.01 Frameset//EN""#),
    ("HTML 4.01 Strict", r#""-//W3C//DTD HTML 4.01//EN""#),
    ("XHTML 1.0 Strict", r#""-//W3C//DTD XHTML 1.0 Strict//EN""#),
    ("XHTML 1.0 Transitional", r#""-//W3C//DTD XHTML 1.0 Transitional//EN""#),
    ("XHTML 1.0 Frameset", r#""-//W3C//DTD XHTML 1.0 Frameset//EN""#),
    ("XHTML 1.1", r#""-//W3C//DTD XHTML 1.1//EN""#),
    ("HTML 5", "<!DOCTYPE html>"),
];

/// Returns the name of the first known doctype found in the document
pub fn detect_html_version(html: &str) -> Option<String> {
    let html = html.to_lowercase();
    DOCTYPE_MARKERS
        .iter()
        .find(|(_, marker)| html.contains(&marker.to_lowercase()))
        .map(|(name, _)| name.to_string())
}

/// Analyzer writing the `htmlVersion` field
#[derive(Debug, Default)]
pub struct VersionAnalyzer;

impl Analyzer for VersionAnalyzer {
    fn stage(&self) -> Stage {
        Stage::Version
    }

    fn analyze<'a>(
        &'a self,
        document: &'a Document,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
        let version = detect_html_version(document.content());
        ::log::debug!("HTML version of {}: {:?}", document.url(), version);
        future::ready(Ok(Contribution::Version(version))).boxed()
    }
}
