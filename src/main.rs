//! Company Harvester main entry point
//!
//! This is the command-line interface for the company website harvester.

use anyhow::Context;
use clap::Parser;
use company_harvester::config::{load_config_with_hash, validate, Config};
use company_harvester::pipeline::{run_harvest, CareersOutcome, HarvestOptions};
use company_harvester::url::parse_seed_url;
use company_harvester::CareersReport;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Company Harvester: capture a company website as text
///
/// Crawls a company site within its own origin, saves cleaned HTML pages and
/// linked documents, captures the careers page and normalizes everything into
/// flat text files.
#[derive(Parser, Debug)]
#[command(name = "company-harvester")]
#[command(version)]
#[command(about = "Crawl a company website and normalize its content", long_about = None)]
struct Cli {
    /// Start URL of the company site (https:// is assumed when omitted)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory under which the <name>_scraped_data folder is created
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Maximum page hops from the start URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Number of concurrent crawl workers
    #[arg(long)]
    concurrency: Option<usize>,

    /// Disable TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Skip the careers sub-crawl
    #[arg(long)]
    skip_careers: bool,

    /// Skip text normalization
    #[arg(long)]
    skip_normalize: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    let seed = parse_seed_url(&cli.url).with_context(|| format!("Invalid start URL '{}'", cli.url))?;

    if cli.dry_run {
        handle_dry_run(&config, &seed);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            ctrl_c.cancel();
        }
    });

    let options = HarvestOptions {
        skip_careers: cli.skip_careers,
        skip_normalize: cli.skip_normalize,
    };

    let summary = match run_harvest(&config, &seed, options, config_hash, cancel).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        println!("✓ Harvest of {} complete", seed);
        println!("  Output: {}", summary.layout.root().display());
        println!(
            "  Pages: {}, documents: {}, failures: {}",
            summary.crawl.pages.len(),
            summary.crawl.documents.len(),
            summary.crawl.failures.len()
        );
        match &summary.careers {
            CareersOutcome::Report(CareersReport::Found(record)) => {
                println!("  Careers: {} ({} links)", record.careers_url, record.links.len())
            }
            CareersOutcome::Report(CareersReport::NotFound) => println!("  Careers: not found"),
            CareersOutcome::Failed(message) => println!("  Careers: failed ({})", message),
            CareersOutcome::Skipped => {}
        }
        if summary.crawl.cancelled {
            println!("  Crawl was cancelled; output is partial");
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("company_harvester=info,warn"),
            1 => EnvFilter::new("company_harvester=debug,info"),
            2 => EnvFilter::new("company_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Folds command-line flags over the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output.root = dir.display().to_string();
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if cli.insecure {
        config.crawler.insecure_tls = true;
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, seed: &url::Url) {
    use company_harvester::output::SiteLayout;
    use std::path::Path;

    let layout = SiteLayout::for_seed(Path::new(&config.output.root), seed);

    println!("=== Company Harvester Dry Run ===\n");
    println!("Start URL: {}", seed);
    println!("Output: {}", layout.root().display());

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    match config.crawler.crawl_deadline_secs {
        Some(secs) => println!("  Crawl deadline: {}s", secs),
        None => println!("  Crawl deadline: none"),
    }
    println!("  Verify TLS: {}", !config.crawler.insecure_tls);
    println!("  Exclusion selectors: {}", config.crawler.exclusion_selectors.join(", "));

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!(
        "  Backoff: {}ms doubling, capped at {}ms",
        config.retry.base_delay_ms, config.retry.max_delay_ms
    );

    println!("\nCareers:");
    println!("  Link text: {} ({:?})", config.careers.link_text.join(", "), config.careers.match_mode);
    println!("  Document class: {}", config.careers.document_class);

    println!("\nUser Agent: {}/{}", config.user_agent.crawler_name, config.user_agent.crawler_version);

    println!("\n✓ Configuration is valid");
}
