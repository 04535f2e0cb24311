//! Sumi-Links main entry point
//!
//! This is the command-line interface for the Sumi-Links page link extractor.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_links::config::{load_config, Config};
use sumi_links::url::ensure_scheme;
use sumi_links::{render_json, LinkError, PageLinkExtractor};
use tracing_subscriber::EnvFilter;

/// Sumi-Links: extract every link from a single web page
///
/// Fetches the page once with browser-like headers, resolves each anchor to
/// an absolute http(s) URL and prints the result as JSON. When no URL is given
/// on the command line, it is read from the terminal.
#[derive(Parser, Debug)]
#[command(name = "sumi-links")]
#[command(version)]
#[command(about = "Extract the links of a single web page as JSON", long_about = None)]
struct Cli {
    /// URL of the page to extract links from (https:// is assumed when missing)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                LinkError::from(e)
            })?
        }
        None => Config::default(),
    };

    let input = match cli.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let input = input.trim();
    if input.is_empty() {
        return Err(LinkError::MissingUrl.into());
    }

    let target = ensure_scheme(input);
    if target != input {
        tracing::warn!("No scheme (http/https) provided. Assuming https:// for {}", input);
    }

    let extractor = PageLinkExtractor::new(&config.fetcher).map_err(LinkError::from)?;

    tracing::info!("Crawling {} for links...", target);
    let outcome = extractor.extract(&target).await;

    println!("{}", render_json(&outcome).map_err(LinkError::from)?);

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the JSON report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_links=info,warn"),
            1 => EnvFilter::new("sumi_links=debug,info"),
            2 => EnvFilter::new("sumi_links=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Asks for the target URL on stderr and reads one line from stdin
fn prompt_for_url() -> sumi_links::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "Enter the website URL to crawl: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}
