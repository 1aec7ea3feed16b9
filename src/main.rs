//! Sitemap-Ripple main entry point
//!
//! This is the command-line interface for the Sitemap-Ripple crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use sitemap_ripple::config::{load_config_with_hash, Config, ResumeMode};
use sitemap_ripple::crawler::{CrawlOutcome, Engine, HttpFetcher};
use sitemap_ripple::output::{Pinger, SitemapStatistics, SitemapWriter};
use sitemap_ripple::priority::{additional_records, classify};
use sitemap_ripple::storage::{open_store, CheckpointStore, SqliteCheckpointStore};
use sitemap_ripple::url::{CrawlTarget, PathCategory, PathRules, UrlValidator};
use tracing_subscriber::EnvFilter;

/// Exit status asking a supervisor to run the crawler again (`EX_TEMPFAIL`)
const EXIT_RESUME_LATER: u8 = 75;

/// Sitemap-Ripple: crawl one site and write its sitemap
///
/// Sitemap-Ripple visits every page reachable from the root address, scores
/// each page from its incoming and outgoing links, writes a sitemaps.org XML
/// file and optionally pings search engines. Long crawls checkpoint and resume.
#[derive(Parser, Debug)]
#[command(name = "sitemap-ripple")]
#[command(version)]
#[command(about = "Single-site crawler and sitemap generator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discard any pending checkpoint and start from the root
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["status", "fresh"])]
    dry_run: bool,

    /// Show the pending checkpoint for this session and exit
    #[arg(long, conflicts_with_all = ["dry_run", "fresh"])]
    status: bool,

    /// Do not notify ping endpoints after writing the sitemap
    #[arg(long)]
    no_ping: bool,

    /// Write the sitemap here instead of the configured path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::debug!("Configuration hash: {}", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)?;
        Ok(ExitCode::SUCCESS)
    } else if cli.status {
        handle_status(&config)?;
        Ok(ExitCode::SUCCESS)
    } else {
        let writer = SitemapWriter::new(&config.output.sitemap_path)
            .with_output(cli.output.as_deref().unwrap_or_default());
        handle_crawl(&config, &config_hash, &writer, cli.fresh, cli.no_ping).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Per-page progress lines use the `progress` target and are shown unless
/// `--quiet` is given.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_ripple=info,progress=info,warn"),
            1 => EnvFilter::new("sitemap_ripple=debug,progress=info,info"),
            2 => EnvFilter::new("sitemap_ripple=trace,progress=info,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let target = CrawlTarget::new(&config.crawler.root_url).context("Invalid root URL")?;
    let rules = PathRules::compile(&config.paths);

    println!("=== Sitemap-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root: {}", target.root());
    println!("  Scope: {}", target.scope());
    match config.crawler.visit_limit {
        0 => println!("  Visit limit: unlimited"),
        limit => println!("  Visit limit: {}", limit),
    }
    println!("  Query strings: {}", if config.crawler.allow_query { "allowed" } else { "rejected" });
    println!("  User agent: {}", config.crawler.user_agent);
    println!(
        "  Basic auth: {}",
        config.crawler.username.as_deref().unwrap_or("none")
    );
    println!("  Timeout: {}s", config.crawler.timeout_secs);

    println!("\nPath Rules:");
    for (name, category) in [
        ("Disabled", PathCategory::Disabled),
        ("Primary", PathCategory::Primary),
        ("Normal", PathCategory::Normal),
        ("Secondary", PathCategory::Secondary),
    ] {
        match rules.get(category) {
            Some(matcher) => println!("  {}: {}", name, matcher.fragments().join(", ")),
            None => println!("  {}: (none)", name),
        }
    }

    let validator = UrlValidator::new(target, rules, config.crawler.allow_query);
    let accepted = additional_records(&validator, &config.additional);
    println!(
        "\nAdditional URLs ({} of {} valid):",
        accepted.len(),
        config.additional.len()
    );
    for (url, record) in &accepted {
        println!("  - {} ({}, {})", url, record.priority, record.change_freq);
    }

    println!("\nCheckpoint:");
    println!(
        "  Database: {}",
        config
            .checkpoint
            .database_path
            .as_deref()
            .unwrap_or("(in memory)")
    );
    println!("  Session: {}", config.checkpoint.session_name);
    match config.checkpoint.execution_budget_secs {
        0 => println!("  Execution budget: unlimited"),
        budget => println!(
            "  Execution budget: {}s ({}s safety margin)",
            budget, config.checkpoint.safety_margin_secs
        ),
    }

    println!("\nOutput:");
    println!("  Sitemap: {}", config.output.sitemap_path);
    if let Some(ping) = &config.ping {
        println!("  Ping endpoints: {}", ping.urls.len());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --status mode: shows the pending checkpoint
fn handle_status(config: &Config) -> anyhow::Result<()> {
    let Some(path) = config.checkpoint.database_path.as_deref() else {
        println!("No checkpoint database configured; checkpoints are kept in memory only");
        return Ok(());
    };

    println!("Database: {}\n", path);

    let store = SqliteCheckpointStore::new(Path::new(path))
        .with_context(|| format!("Failed to open checkpoint database {}", path))?;

    match store.fetch(&config.checkpoint.session_name)? {
        Some(snapshot) => {
            println!("=== Pending Checkpoint ===\n");
            println!("  Session: {}", config.checkpoint.session_name);
            println!("  Visited: {}", snapshot.visited);
            println!("  Next node: {}", snapshot.visited + 1);
            println!("  Queued: {}", snapshot.queue.len());
            println!("  Found: {}", snapshot.nodes.len());
            if let Some(next) = snapshot.queue.first() {
                println!("  Next URL: {}", next);
            }
            if let Some(saved_at) = snapshot.saved_at {
                println!("  Saved at: {}", saved_at.to_rfc3339());
            }
        }
        None => println!(
            "No pending checkpoint for session '{}'",
            config.checkpoint.session_name
        ),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    writer: &SitemapWriter,
    fresh: bool,
    no_ping: bool,
) -> anyhow::Result<ExitCode> {
    let session = &config.checkpoint.session_name;
    let database = config.checkpoint.database_path.as_deref().map(Path::new);

    if database.is_none() && config.checkpoint.resume_mode == ResumeMode::Exit {
        tracing::warn!("resume-mode \"exit\" without database-path: checkpoints will be lost on exit");
    }

    let mut store = open_store(database).context("Failed to open checkpoint store")?;
    if fresh {
        tracing::info!("Starting fresh crawl (discarding checkpoint '{}')", session);
        store.delete(session)?;
    }

    let fetcher = HttpFetcher::new(&config.crawler).context("Failed to build HTTP client")?;

    let crawl = loop {
        let mut engine = Engine::from_config(config, fetcher.clone(), &mut store)?
            .with_config_hash(config_hash);

        match engine.run().await.context("Crawl failed")? {
            CrawlOutcome::Completed(crawl) => break crawl,
            CrawlOutcome::Checkpointed {
                visited,
                resume_after,
            } => match config.checkpoint.resume_mode {
                ResumeMode::Sleep => {
                    tokio::time::sleep(resume_after).await;
                }
                ResumeMode::Exit => {
                    tracing::info!(
                        "Run again with the same configuration to resume at node {}",
                        visited + 1
                    );
                    return Ok(ExitCode::from(EXIT_RESUME_LATER));
                }
            },
        }
    };

    let results = classify(&crawl, &config.additional);
    SitemapStatistics::from_records(&results).log();

    writer
        .write(&results)
        .with_context(|| format!("Failed to write sitemap {}", writer.path().display()))?;

    if let Some(ping) = config.ping.as_ref().filter(|_| !no_ping) {
        let pinger = Pinger::new(ping, &config.crawler.user_agent)?;
        let reports = pinger.ping().await;
        let failed = reports.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            tracing::warn!("{} of {} pings failed", failed, reports.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_flag_overrides_configured_path() {
        let cli = Cli::try_parse_from(["sitemap-ripple", "site.toml", "-o", "public/sitemap.xml"])
            .unwrap();
        let writer =
            SitemapWriter::new("sitemap.xml").with_output(cli.output.as_deref().unwrap_or_default());
        assert_eq!(writer.path(), Path::new("public/sitemap.xml"));
    }

    #[test]
    fn test_configured_path_kept_without_output_flag() {
        let cli = Cli::try_parse_from(["sitemap-ripple", "site.toml"]).unwrap();
        assert!(cli.output.is_none());
        let writer =
            SitemapWriter::new("sitemap.xml").with_output(cli.output.as_deref().unwrap_or_default());
        assert_eq!(writer.path(), Path::new("sitemap.xml"));
    }
}
