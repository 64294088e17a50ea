// src/main.rs
// =============================================================================
// This is the entry point of the page-inspector CLI.
//
// What happens here:
// 1. Initialise logging (RUST_LOG controls the level, logs go to stderr)
// 2. Parse command-line arguments using clap
// 3. Build the configuration and the shared HTTP client
// 4. Dispatch to the subcommand handler and print its report to stdout
// 5. Exit with proper code (0 = success, 1 = analysis failed or dead links,
//    2 = unexpected error)
// =============================================================================

mod analyze; // src/analyze/ - the analyzers and the pipeline running them
mod checker; // src/checker/ - link extraction and link probing
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - AppConfig and the HTTP client
mod fetch; // src/fetch/ - downloading the page

use analyze::{
    count_unreachable, inspect_page, AnalysisError, AnalysisResult, CancellationToken, LinkRecord,
    Orchestrator,
};
use anyhow::Result;
use checker::LinkChecker;
use clap::Parser;
use cli::{Cli, ClientArgs, Commands};
use config::AppConfig;

#[tokio::main]
async fn main() {
    env_logger::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            ::log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success
//   Ok(1) = analysis failed, or unreachable links found
//   Err = unexpected error (config, client construction, output)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { url, json, client } => handle_analyze(&url, json, &client).await,
        Commands::Links { url, json, client } => handle_links(&url, json, &client).await,
    }
}

// Handles the 'analyze' subcommand: the full report
async fn handle_analyze(url: &str, json: bool, args: &ClientArgs) -> Result<i32> {
    let config = AppConfig::load(args)?;
    let client = config.build_client()?;
    let orchestrator = Orchestrator::standard(LinkChecker::from_client(client.clone()));

    match inspect_page(&client, &orchestrator, url).await {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result);
            }
            Ok(0)
        }
        Err(error) => {
            print_error(&error, json)?;
            Ok(1)
        }
    }
}

// Handles the 'links' subcommand: fetch, extract and probe only
async fn handle_links(url: &str, json: bool, args: &ClientArgs) -> Result<i32> {
    let config = AppConfig::load(args)?;
    let client = config.build_client()?;

    let document = match fetch::fetch_page(&client, url).await {
        Ok(document) => document,
        Err(error) => {
            print_error(&error, json)?;
            return Ok(1);
        }
    };

    let links = checker::extract_html_links(document.content(), document.base_origin());
    ::log::info!("Checking {} link(s) found on {}", links.len(), url);

    let checker = LinkChecker::from_client(client);
    let records = checker
        .check_links(links, document.base_origin(), &CancellationToken::new())
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_links_table(&records);
    }

    Ok(if count_unreachable(&records) > 0 { 1 } else { 0 })
}

fn print_error(error: &AnalysisError, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(error)?);
    } else {
        eprintln!("❌ Analysis failed ({}): {}", error.code, error);
        if let Some(detail) = &error.detail {
            eprintln!("   {}", detail);
        }
    }
    Ok(())
}

// Prints the full report in a human-readable form
fn print_report(result: &AnalysisResult) {
    println!("🔍 {}", result.executed_url);
    println!("   Base path:    {}", result.base_path);
    println!(
        "   HTML version: {}",
        result.html_version.as_deref().unwrap_or("unknown")
    );
    println!("   Title:        {}", result.title.as_deref().unwrap_or("-"));
    println!(
        "   Login form:   {}",
        if result.has_login { "yes" } else { "no" }
    );
    println!();

    println!("📑 Headings ({})", result.headings.len());
    for heading in &result.headings {
        println!("   {:<4} {}", heading.tag, heading.text);
    }
    println!();

    println!(
        "🌐 Links ({}, {} unreachable)",
        result.links.len(),
        result.unreachable_count()
    );
    print_links_table(&result.links);

    println!(
        "⏱️  Fetch: {} ms, analysis: {} ms, total: {} ms",
        result.web_page_extract_time, result.service_time, result.app_execute_total_time
    );
}

// Prints link records as a table, followed by a summary
fn print_links_table(records: &[LinkRecord]) {
    println!("{:<60} {:<10} {:<8} {:<8}", "URL", "TYPE", "STATUS", "TIME");
    println!("{}", "=".repeat(88));

    for record in records {
        println!(
            "{:<60} {:<10} {:<8} {:<8}",
            truncate(&record.url, 57),
            record.link_type.to_string(),
            format_status(record),
            format!("{}ms", record.probe_duration_ms)
        );
    }
    println!();

    let unreachable = count_unreachable(records);
    println!("📊 Summary:");
    println!("   ✅ Accessible: {}", records.len() - unreachable);
    println!("   ❌ Unreachable: {}", unreachable);
    println!("   📋 Total: {}", records.len());
    println!();
}

fn format_status(record: &LinkRecord) -> String {
    match record.status {
        checker::FAILED_STATUS => "ERROR".to_string(),
        checker::TIMEOUT_STATUS if !record.accessible => "TIMEOUT".to_string(),
        status => status.to_string(),
    }
}

// Shortens long URLs for display, on a char boundary
fn truncate(url: &str, max_chars: usize) -> String {
    if url.chars().count() > max_chars {
        let short: String = url.chars().take(max_chars).collect();
        format!("{}...", short)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyze::LinkType;

    fn record(status: u16) -> LinkRecord {
        LinkRecord {
            url: "http://example.com/a".to_string(),
            accessible: status == 200,
            link_type: LinkType::Internal,
            status,
            probe_duration_ms: 3,
        }
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(&record(200)), "200");
        assert_eq!(format_status(&record(404)), "404");
        assert_eq!(format_status(&record(0)), "ERROR");
        assert_eq!(format_status(&record(408)), "TIMEOUT");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
        // Multi-byte characters are never split
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
