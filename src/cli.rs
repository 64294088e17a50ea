// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Two subcommands:
// - analyze: the full page report (version, title, login form, headings, links)
// - links: only the link check, handy in CI to catch dead links
//
// Both share the same HTTP options through #[command(flatten)].
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "page-inspector",
    version,
    about = "Analyze a web page: HTML version, title, headings, login forms and link health",
    long_about = "page-inspector fetches one web page and reports its HTML version, title, \
                  headings, whether it has a login form, and the reachability of every link on it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Produce the full analysis report for a web page
    ///
    /// Example: page-inspector analyze https://example.com --json
    Analyze {
        /// Web page URL (e.g., https://example.com)
        url: String,

        /// Output the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Check every link on a web page; exits with 1 if any is unreachable
    ///
    /// Example: page-inspector links https://example.com
    Links {
        /// Web page URL (e.g., https://example.com)
        url: String,

        /// Output the link records as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        client: ClientArgs,
    },
}

// HTTP options shared by every subcommand
//
// Each one is optional: None means "keep what the config file (or the
// default) says". See config::AppConfig::load.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// JSON config file with timeout_ms, max_redirects and user_agent
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "PAGE_INSPECTOR_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum number of redirects to follow per request
    #[arg(long, env = "PAGE_INSPECTOR_MAX_REDIRECTS")]
    pub max_redirects: Option<usize>,
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It splices the fields of ClientArgs into the subcommand
//    - So both `analyze` and `links` accept --timeout-ms and friends
//      without repeating the field definitions
//
// 2. Why Option<u64> instead of a default_value?
//    - A default here would always win over the config file
//    - With Option, "not given" stays distinguishable from "given"
//
// 3. What does env = "..." do?
//    - If the flag is missing, clap reads the environment variable instead
//    - Needs clap's "env" feature (see Cargo.toml)
// -----------------------------------------------------------------------------
