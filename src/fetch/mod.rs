// src/fetch/mod.rs
// =============================================================================
// This module downloads the page that is going to be analyzed.
//
// One GET request, no crawling: the analysis works on exactly the page the
// user asked for. The shared reqwest Client (built from AppConfig) brings
// the timeout, redirect policy and user agent.
// =============================================================================

mod page;

// Re-export the main fetch function
pub use page::fetch_page;
