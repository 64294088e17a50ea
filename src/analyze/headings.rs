// src/analyze/headings.rs
// =============================================================================
// Extracts h1..h6 headings from a token stream.
//
// How it works:
// 1. Scan tokens until a start tag named h1..h6 shows up
// 2. Collect the heading's text:
//    - the first non-blank text segment inside the heading, trimmed
//    - nested tags are tracked with a depth counter so we notice when the
//      heading closes before any text appeared (empty heading)
// 3. Emit the Heading and keep scanning
//
// Whitespace-only text does not count as the heading's text. So
// `<h1> <span>Sub</span></h1>` gives "Sub", not "": the formatting
// whitespace between a heading tag and its content is skipped.
//
// The stream running out ends everything: a heading that was still open gets
// whatever text we had (possibly none) and no further headings are produced.
//
// Rust concepts:
// - Iterator: HeadingExtractor yields headings lazily, one per next() call
// - Generics: It works over any iterator of tokens, not just a Vec
// =============================================================================

use super::result::{AnalysisError, Contribution, Heading};
use super::tokens::{is_void_element, tokenize, HtmlToken};
use super::{Analyzer, CancellationToken, Document, Stage};
use futures::future::{self, BoxFuture, FutureExt};
use std::time::Instant;

/// Lazily yields headings from any token iterator.
///
/// Not restartable: once it returns None it keeps returning None.
pub struct HeadingExtractor<I> {
    tokens: I,
    finished: bool,
}

impl<I> HeadingExtractor<I>
where
    I: Iterator<Item = HtmlToken>,
{
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            finished: false,
        }
    }

    // Collects the text for a heading whose start tag was just consumed
    fn collect(&mut self, tag: String) -> Heading {
        let mut depth: i32 = 0;

        loop {
            match self.tokens.next() {
                None => {
                    // Unterminated heading at end of stream
                    self.finished = true;
                    return Heading::new(tag, "");
                }
                Some(HtmlToken::Text(text)) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Heading::new(tag, trimmed);
                    }
                }
                Some(HtmlToken::StartTag { name, self_closing }) => {
                    if !self_closing && !is_void_element(&name) {
                        depth += 1;
                    }
                }
                Some(HtmlToken::EndTag { .. }) => {
                    depth -= 1;
                    if depth < 0 {
                        // The heading's own end tag, no text inside
                        return Heading::new(tag, "");
                    }
                }
            }
        }
    }
}

impl<I> Iterator for HeadingExtractor<I>
where
    I: Iterator<Item = HtmlToken>,
{
    type Item = Heading;

    fn next(&mut self) -> Option<Heading> {
        if self.finished {
            return None;
        }

        while let Some(token) = self.tokens.next() {
            if let HtmlToken::StartTag { name, .. } = token {
                if is_heading_tag(&name) {
                    return Some(self.collect(name));
                }
            }
        }

        self.finished = true;
        None
    }
}

/// true for h1 through h6
pub fn is_heading_tag(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Extracts every heading of an HTML document in document order
pub fn extract_headings(html: &str) -> Vec<Heading> {
    HeadingExtractor::new(tokenize(html)).collect()
}

/// Analyzer writing the `headings` field
#[derive(Debug, Default)]
pub struct HeadingAnalyzer;

impl Analyzer for HeadingAnalyzer {
    fn stage(&self) -> Stage {
        Stage::Headings
    }

    fn analyze<'a>(
        &'a self,
        document: &'a Document,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
        ::log::debug!("Analyzing headings of {}", document.url());
        let started = Instant::now();

        let headings = extract_headings(document.content());

        ::log::debug!(
            "Found {} heading(s) in {} ms",
            headings.len(),
            started.elapsed().as_millis()
        );
        future::ready(Ok(Contribution::Headings(headings))).boxed()
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an Iterator instead of returning a Vec directly?
//    - The tests can feed hand-built token lists through the same code
//    - extract_headings just calls .collect() on it
//
// 2. What does the depth counter do?
//    - It goes up on every start tag inside the heading and down on every
//      end tag, so the heading's own end tag is the one that takes it below 0
//    - Void elements like <img> and <br> never close, so they are skipped
// -----------------------------------------------------------------------------
