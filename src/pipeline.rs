//! End-to-end harvest of one company site
//!
//! Runs the four stages in order: site crawl, careers crawl, normalization,
//! summary. The site crawl and careers crawl share one retrying fetcher.

use crate::config::Config;
use crate::crawler::{build_fetcher, CareersCrawler, CareersOptions, CareersReport, CrawlOptions, CrawlReport, SiteCrawler};
use crate::normalize::{write_normalized, NormalizedText, Normalizer, TextPipeline, HTML_EXTENSIONS, PDF_EXTENSIONS};
use crate::output::{write_markdown_summary, SiteLayout};
use crate::HarvestError;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Stage switches for a harvest
#[derive(Debug, Clone, Copy, Default)]
pub struct HarvestOptions {
    pub skip_careers: bool,
    pub skip_normalize: bool,
}

/// Result of the careers stage
#[derive(Debug, Clone)]
pub enum CareersOutcome {
    Skipped,
    Report(CareersReport),
    /// The start or careers page could not be fetched
    Failed(String),
}

/// One written normalization output
#[derive(Debug, Clone)]
pub struct NormalizedOutput {
    pub path: PathBuf,
    pub files: usize,
    pub failures: usize,
    pub words: usize,
}

impl NormalizedOutput {
    fn new(path: PathBuf, normalized: &NormalizedText) -> Self {
        Self {
            path,
            files: normalized.files.len(),
            failures: normalized.failures.len(),
            words: normalized.text.split_whitespace().count(),
        }
    }
}

/// Everything a harvest produced
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub layout: SiteLayout,
    pub crawl: CrawlReport,
    pub careers: CareersOutcome,
    pub normalized: Vec<NormalizedOutput>,
    pub config_hash: Option<String>,
}

/// Harvests `seed` according to `config`
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `seed` - Start URL of the company site
/// * `options` - Stages to skip
/// * `config_hash` - Hash of the config file, recorded in the summary
/// * `cancel` - Cancels the site and careers crawls; normalization still runs
///   on partial output
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - Harvest completed (possibly partially)
/// * `Err(HarvestError)` - The client could not be built or output could not be written
pub async fn run_harvest(
    config: &Config,
    seed: &Url,
    options: HarvestOptions,
    config_hash: Option<String>,
    cancel: CancellationToken,
) -> Result<HarvestSummary, HarvestError> {
    let layout = SiteLayout::for_seed(Path::new(&config.output.root), seed);
    tracing::info!("Harvesting {} into {}", seed, layout.root().display());

    let fetcher = build_fetcher(config)?;

    let site_crawler = SiteCrawler::new(fetcher.clone(), CrawlOptions::from_config(&config.crawler));
    let crawl = site_crawler
        .crawl_with_cancellation(seed, &layout, cancel.clone())
        .await?;

    let careers = if options.skip_careers || cancel.is_cancelled() {
        CareersOutcome::Skipped
    } else {
        let careers_crawler = CareersCrawler::new(fetcher, CareersOptions::from_config(&config.careers));
        match careers_crawler
            .crawl_with_cancellation(seed, &layout, cancel.clone())
            .await
        {
            Ok(report) => CareersOutcome::Report(report),
            Err(HarvestError::Fetch(e)) => {
                tracing::warn!("Careers crawl failed: {}", e);
                CareersOutcome::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        }
    };

    let normalized = if options.skip_normalize {
        Vec::new()
    } else {
        // PDF extraction and file IO are synchronous
        let normalize_config = config.clone();
        let normalize_layout = layout.clone();
        tokio::task::spawn_blocking(move || normalize_outputs(&normalize_config, &normalize_layout)).await??
    };

    let summary = HarvestSummary {
        layout,
        crawl,
        careers,
        normalized,
        config_hash,
    };

    write_markdown_summary(&summary, &summary.layout.summary_path())?;
    tracing::info!("Summary written to {}", summary.layout.summary_path().display());

    Ok(summary)
}

/// Writes `documents.txt`, `all_html.txt` and, when the careers crawl ran, `careers.txt`
pub fn normalize_outputs(config: &Config, layout: &SiteLayout) -> Result<Vec<NormalizedOutput>, HarvestError> {
    let pipeline = TextPipeline::from_config(&config.normalizer);
    let mut outputs = Vec::new();

    let documents = Normalizer::new(&pipeline, PDF_EXTENSIONS).normalize_dir(&layout.documents_dir())?;
    write_normalized(&layout.documents_text(), &documents)?;
    outputs.push(NormalizedOutput::new(layout.documents_text(), &documents));

    let pages = Normalizer::new(&pipeline, HTML_EXTENSIONS).normalize_dir(&layout.htmls_dir())?;
    write_normalized(&layout.all_html_text(), &pages)?;
    outputs.push(NormalizedOutput::new(layout.all_html_text(), &pages));

    let careers_links = layout.careers_links_dir();
    if careers_links.is_dir() {
        let careers = Normalizer::new(&pipeline, HTML_EXTENSIONS).normalize_dir(&careers_links)?;
        write_normalized(&layout.careers_text(), &careers)?;
        outputs.push(NormalizedOutput::new(layout.careers_text(), &careers));
    }

    for output in &outputs {
        tracing::info!(
            "Wrote {} ({} files, {} words)",
            output.path.display(),
            output.files,
            output.words
        );
    }

    Ok(outputs)
}
