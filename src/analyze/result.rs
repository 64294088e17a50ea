// src/analyze/result.rs
// =============================================================================
// This module defines the data that flows out of an analysis run.
//
// - AnalysisResult: the single report for one page (what the user sees)
// - Heading / LinkRecord: the pieces the heading and link analyzers produce
// - Contribution: one analyzer's finished work, sent to the aggregator
// - AnalysisError: the one error that can terminate a run
//
// The JSON field names match the wire format existing clients already read,
// which is why several Rust fields carry a #[serde(rename = ...)].
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The complete report for one analyzed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The URL the user asked us to analyze
    pub executed_url: String,
    /// scheme://host[:port] of the executed URL
    pub base_path: String,
    /// Declared markup version, e.g. "HTML 5"
    pub html_version: Option<String>,
    pub title: Option<String>,
    pub has_login: bool,
    /// Headings in document order
    pub headings: Vec<Heading>,
    /// One record per link reference found, in no particular order
    #[serde(rename = "urls")]
    pub links: Vec<LinkRecord>,
    /// Milliseconds spent fetching the page
    pub web_page_extract_time: u64,
    /// Milliseconds spent in the analysis phase
    pub service_time: u64,
    /// Milliseconds for the whole request
    pub app_execute_total_time: u64,
}

impl AnalysisResult {
    pub fn new(executed_url: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            executed_url: executed_url.into(),
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Writes one analyzer's fields into the report.
    ///
    /// Only the aggregating task calls this, so no locking is needed.
    pub fn apply(&mut self, contribution: Contribution) {
        match contribution {
            Contribution::Version(version) => self.html_version = version,
            Contribution::Title(title) => self.title = title,
            Contribution::LoginForm(has_login) => self.has_login = has_login,
            Contribution::Headings(headings) => self.headings.extend(headings),
            Contribution::Links(links) => self.links.extend(links),
        }
    }

    /// Number of links that did not answer with HTTP 200
    pub fn unreachable_count(&self) -> usize {
        count_unreachable(&self.links)
    }
}

/// Number of records that did not answer with HTTP 200
pub fn count_unreachable(links: &[LinkRecord]) -> usize {
    links.iter().filter(|link| !link.accessible).count()
}

/// A heading element (h1..h6) and its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub tag: String,
    pub text: String,
}

impl Heading {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

/// Whether a link points back into the analyzed site or somewhere else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkType {
    Internal,
    External,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Internal => write!(f, "INTERNAL"),
            LinkType::External => write!(f, "EXTERNAL"),
        }
    }
}

/// The outcome of probing one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Absolute URL that was probed
    pub url: String,
    /// true only when the link answered with exactly HTTP 200
    pub accessible: bool,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// HTTP status, 408 on timeout, 0 when the request failed outright
    pub status: u16,
    /// Milliseconds from request start to completion or failure
    #[serde(rename = "urlExecutionTime")]
    pub probe_duration_ms: u64,
}

/// One analyzer's finished work.
///
/// Each variant names the disjoint set of fields that analyzer owns.
#[derive(Debug, Clone, PartialEq)]
pub enum Contribution {
    Version(Option<String>),
    Title(Option<String>),
    LoginForm(bool),
    Headings(Vec<Heading>),
    Links(Vec<LinkRecord>),
}

/// Which step of the pipeline produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Fetch,
    Version,
    Title,
    LoginForm,
    Headings,
    Links,
    Orchestrator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Version => "version",
            Stage::Title => "title",
            Stage::LoginForm => "login form",
            Stage::Headings => "headings",
            Stage::Links => "links",
            Stage::Orchestrator => "orchestrator",
        };
        f.write_str(name)
    }
}

/// The error that terminates an analysis run.
///
/// `code` follows HTTP semantics so a transport layer can map it directly.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{stage}: {message}")]
#[serde(rename_all = "camelCase")]
pub struct AnalysisError {
    pub stage: Stage,
    pub message: String,
    #[serde(rename = "errorMsg")]
    pub detail: Option<String>,
    #[serde(rename = "statusCode")]
    pub code: u16,
}

impl AnalysisError {
    pub const BAD_REQUEST: u16 = 400;
    pub const INTERNAL: u16 = 500;

    /// A failure caused by the input: bad URL, unreachable page, undecodable HTML
    pub fn bad_request(stage: Stage, message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            detail,
            code: Self::BAD_REQUEST,
        }
    }

    pub fn internal(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            detail: None,
            code: Self::INTERNAL,
        }
    }
}
