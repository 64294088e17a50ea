// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - html: Extracts href/src references from HTML and resolves them
// - http: Probes every resolved link concurrently and records the outcome
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod html;
mod http;

// Re-export public items from submodules
// This lets users write `checker::extract_html_links()` instead of
// `checker::html::extract_html_links()`
pub use html::extract_html_links;
pub use http::{LinkChecker, FAILED_STATUS, TIMEOUT_STATUS};

// The probing seam; substitute probers only exist in tests
#[cfg(test)]
pub use http::{ProbeError, Prober};
