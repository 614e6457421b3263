//! Catalog-Worker main entry point
//!
//! The host starts this process, writes requests to its stdin and reads
//! fetch requests and results from its stdout. Diagnostics go to stderr.

use anyhow::Context;
use catalog_worker::config::{load_profile, SiteProfile};
use catalog_worker::crawler::{serve, Outcome};
use catalog_worker::state::EnumerationState;
use catalog_worker::transport::stdio_proxy;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Catalog-Worker: a resumable product-catalog crawler worker
///
/// Speaks line-delimited JSON on stdin/stdout. Send `{"type":"list"}` (with an
/// optional `"state":"c.b.p"`) to enumerate item ids, or `{"type":"info","id":...}`
/// to extract product records. Every page is fetched by the host.
#[derive(Parser, Debug)]
#[command(name = "catalog-worker")]
#[command(version = "1.0.0")]
#[command(about = "A resumable product-catalog crawler worker", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the site profile and show the crawl plan without talking to a host
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let profile = load_profile(SiteProfile::default()).context("site profile is invalid")?;

    if cli.dry_run {
        return handle_dry_run(&profile);
    }

    handle_serve(&profile)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only protocol messages.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose, quiet));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Filter directives used when `RUST_LOG` is not set
fn default_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    match verbose {
        0 => EnvFilter::new("catalog_worker=warn,warn"),
        1 => EnvFilter::new("catalog_worker=info,warn"),
        2 => EnvFilter::new("catalog_worker=debug,info"),
        _ => EnvFilter::new("trace"),
    }
}

/// Handles the --dry-run mode: shows what a full listing crawl would cover
fn handle_dry_run(profile: &SiteProfile) -> anyhow::Result<()> {
    println!("=== Catalog-Worker Dry Run ===\n");

    println!("Categories ({}):", profile.categories.len());
    for (index, category) in profile.categories.iter().enumerate() {
        println!("  {:>2}: {}", index, category);
    }

    println!("\nPrice buckets ({}):", profile.buckets.len());
    for (index, bucket) in profile.buckets.iter().enumerate() {
        if bucket.is_open_ended() {
            println!("  {:>2}: {} and up", index, bucket.low);
        } else {
            println!("  {:>2}: {} - {}", index, bucket.low, bucket.high);
        }
    }

    let first = profile.listing_url(&EnumerationState::default())?;
    let sample = profile.detail_url("ITEM-ID")?;

    println!("\nListing:");
    println!("  First page: {}", first);
    println!("  Category/bucket pairs: {}", profile.slice_count());
    println!("\nDetail:");
    println!("  Sample: {}", sample);

    println!("\n✓ Site profile is valid");

    Ok(())
}

/// Handles a worker session over stdin/stdout
fn handle_serve(profile: &SiteProfile) -> anyhow::Result<()> {
    let mut proxy = stdio_proxy();

    let outcome = serve(profile, &mut proxy).context("worker session aborted")?;

    match outcome {
        Outcome::Listed(summary) => tracing::debug!(
            "Enumeration finished after {} fetches, last state {:?}",
            proxy.fetch_count(),
            summary.last_state.map(|s| s.to_string())
        ),
        other => tracing::debug!("Session ended: {:?}", other),
    }

    Ok(())
}
