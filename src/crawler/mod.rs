//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML cleaning and link extraction
//! - The bounded-parallel site crawl
//! - The one-hop careers sub-crawl

mod careers;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod report;
mod retry;

pub use careers::{CareersCrawler, CareersMatcher, CareersOptions, CareersRecord, CareersReport};
pub use coordinator::{CrawlOptions, SiteCrawler};
pub use fetcher::{build_http_client, FetchedResource, Fetcher, FetcherOptions, PageFetcher};
pub use frontier::{CrawlTarget, VisitedSet};
pub use parser::{extract_marked_links, extract_page_links, find_anchor_by_text, parse_page, ParsedPage};
pub use report::{CrawlFailure, CrawlReport, SavedArtifact, SkipReason, TargetOutcome};
pub use retry::{RetryPolicy, RetryingFetcher, RETRYABLE_STATUSES};

use crate::config::Config;
use crate::HarvestError;
use std::sync::Arc;

/// Builds the production fetcher stack: reqwest client wrapped in retries
///
/// # Arguments
///
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn PageFetcher>)` - Shared fetcher for crawlers
/// * `Err(HarvestError)` - The HTTP client could not be built
pub fn build_fetcher(config: &Config) -> Result<Arc<dyn PageFetcher>, HarvestError> {
    let fetcher = Fetcher::new(&FetcherOptions::from_config(config))?;
    let policy = RetryPolicy::from_config(&config.retry);
    Ok(Arc::new(RetryingFetcher::new(fetcher, policy)))
}
