// src/analyze/mod.rs
// =============================================================================
// This module turns a fetched page into an AnalysisResult.
//
// Submodules:
// - result: The report, its parts, and the AnalysisError type
// - document: The immutable fetched page all analyzers read
// - tokens: A flat HTML token stream (headings and title use it)
// - cancel: The shared cancellation token
// - version / title / login_form / headings / links: one analyzer each
// - pipeline: Runs all analyzers concurrently and merges their work
//
// Every analyzer implements the same `Analyzer` trait, so the pipeline can
// hold them in one list and treat them all alike.
//
// Rust concepts:
// - Trait objects: Analyzer is used as `dyn Analyzer`
// - BoxFuture: An async fn that can live behind a trait object
// =============================================================================

mod cancel;
mod document;
mod headings;
mod links;
mod login_form;
mod pipeline;
mod result;
mod title;
mod tokens;
mod version;

use futures::future::BoxFuture;
use result::Contribution;

pub use cancel::CancellationToken;
pub use document::Document;
pub use headings::HeadingAnalyzer;
pub use links::LinkAnalyzer;
pub use login_form::LoginFormAnalyzer;
pub use pipeline::{inspect_page, Orchestrator};
pub use result::{count_unreachable, AnalysisError, AnalysisResult, LinkRecord, LinkType, Stage};
pub use title::TitleAnalyzer;
pub use version::VersionAnalyzer;

/// One independent unit of page analysis.
///
/// An analyzer reads the document and returns the fields it owns as a
/// `Contribution`; it never writes to the result itself. `cancel` is raised
/// when another analyzer has already failed, and long-running analyzers
/// check it before starting each unit of work.
pub trait Analyzer: Send + Sync {
    /// The stage reported in errors from this analyzer
    fn stage(&self) -> Stage;

    fn analyze<'a>(
        &'a self,
        document: &'a Document,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Contribution, AnalysisError>>;
}
