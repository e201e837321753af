//! Site crawler - bounded same-origin traversal
//!
//! This module contains the main crawl loop. A coordinator owns the work
//! queue and a pool of at most `concurrency` workers. Each worker processes
//! one [`CrawlTarget`]:
//!
//! 1. The canonical URL is claimed in the shared [`VisitedSet`]; already
//!    claimed URLs are dropped
//! 2. The page is fetched. A redirect must stay in origin, and its final URL
//!    is claimed too
//! 3. The page is cleaned and saved under `htmls/`
//! 4. In-origin links are returned to the coordinator: documents as terminal
//!    download targets, pages at `depth + 1`. Page links past `max_depth`
//!    are only counted
//!
//! Fetch failures are recorded per URL and never abort sibling work.
//! Filesystem failures abort the whole crawl.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{CrawlTarget, VisitedSet};
use crate::crawler::parser::parse_page;
use crate::crawler::report::{CrawlFailure, CrawlReport, SavedArtifact, SkipReason, TargetOutcome};
use crate::output::{ensure_dir, write_artifact, SiteLayout};
use crate::url::{canonicalize_url, classify, document_filename, page_filename, same_origin, ContentKind};
use crate::HarvestError;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Traversal limits for a site crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Maximum page hops from the start URL
    pub max_depth: u32,

    /// Maximum number of targets processed at once
    pub concurrency: usize,

    /// CSS selectors removed from saved pages
    pub exclusion_selectors: Vec<String>,

    /// Stop dequeuing and abandon in-flight work after this long
    pub deadline: Option<Duration>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            concurrency: 8,
            exclusion_selectors: Vec::new(),
            deadline: None,
        }
    }
}

impl CrawlOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            concurrency: config.concurrency.max(1),
            exclusion_selectors: config.exclusion_selectors.clone(),
            deadline: config.crawl_deadline_secs.map(Duration::from_secs),
        }
    }
}

/// State shared by all workers of one crawl
struct WorkerContext {
    fetcher: Arc<dyn PageFetcher>,
    options: Arc<CrawlOptions>,
    visited: VisitedSet,
    seed: Url,
    /// Origin of the start page after redirects; set by the depth-0 worker
    boundary: OnceLock<Url>,
    htmls_dir: PathBuf,
    documents_dir: PathBuf,
}

impl WorkerContext {
    fn boundary(&self) -> &Url {
        self.boundary.get().unwrap_or(&self.seed)
    }
}

/// Recursive same-origin site crawler
pub struct SiteCrawler {
    fetcher: Arc<dyn PageFetcher>,
    options: Arc<CrawlOptions>,
}

impl SiteCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            options: Arc::new(options),
        }
    }

    /// Crawls from `start`, saving into `layout`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Crawl finished, possibly with per-URL failures
    /// * `Err(HarvestError)` - Output directories or files could not be written
    ///
    /// # Example
    ///
    /// ```no_run
    /// use company_harvester::crawler::{CrawlOptions, Fetcher, FetcherOptions, SiteCrawler};
    /// use company_harvester::output::SiteLayout;
    /// use std::path::Path;
    /// use std::sync::Arc;
    /// use url::Url;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = Arc::new(Fetcher::new(&FetcherOptions::default())?);
    /// let crawler = SiteCrawler::new(fetcher, CrawlOptions::default());
    /// let start = Url::parse("https://example.com/")?;
    /// let layout = SiteLayout::for_seed(Path::new("."), &start);
    /// let report = crawler.crawl(&start, &layout).await?;
    /// println!("Saved {} pages", report.pages.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, start: &Url, layout: &SiteLayout) -> Result<CrawlReport, HarvestError> {
        self.crawl_with_cancellation(start, layout, CancellationToken::new())
            .await
    }

    /// Crawls from `start`, stopping early when `cancel` fires
    ///
    /// On cancellation (or when the deadline passes) in-flight fetches are
    /// aborted, queued targets are dropped and the partial report is returned
    /// with `cancelled` set.
    pub async fn crawl_with_cancellation(
        &self,
        start: &Url,
        layout: &SiteLayout,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, HarvestError> {
        let htmls_dir = layout.htmls_dir();
        let documents_dir = layout.documents_dir();
        ensure_dir(&htmls_dir)?;
        ensure_dir(&documents_dir)?;

        let ctx = Arc::new(WorkerContext {
            fetcher: Arc::clone(&self.fetcher),
            options: Arc::clone(&self.options),
            visited: VisitedSet::new(),
            seed: start.clone(),
            boundary: OnceLock::new(),
            htmls_dir,
            documents_dir,
        });

        tracing::info!(
            "Starting site crawl of {} (max depth {}, {} workers)",
            start,
            self.options.max_depth,
            self.options.concurrency
        );

        let deadline = self.options.deadline.map(|d| Instant::now() + d);
        let mut report = CrawlReport::new(start.clone());
        let mut queue = VecDeque::from([CrawlTarget::page(start.clone(), 0)]);
        let mut workers: JoinSet<Result<TargetOutcome, HarvestError>> = JoinSet::new();
        let mut progress = ProgressMilestone::new(25);

        loop {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            while workers.len() < self.options.concurrency {
                let Some(target) = queue.pop_front() else {
                    break;
                };
                workers.spawn(process_target(Arc::clone(&ctx), target));
            }

            if workers.is_empty() {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::warn!("Crawl cancelled, abandoning {} in-flight targets", workers.len());
                    report.cancelled = true;
                    break;
                }
                _ = wait_until(deadline) => {
                    tracing::warn!("Crawl deadline reached, abandoning {} in-flight targets", workers.len());
                    report.cancelled = true;
                    break;
                }
                joined = workers.join_next() => match joined {
                    Some(Ok(Ok(outcome))) => {
                        let discovered = report.record(outcome);
                        queue.extend(discovered);
                    }
                    Some(Ok(Err(e))) => {
                        tracing::error!("Aborting crawl of {}: {}", start, e);
                        workers.abort_all();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        tracing::error!("Crawl worker failed: {}", e);
                    }
                    None => {}
                },
            }

            let pages = report.pages.len();
            if progress.reached(pages) {
                tracing::debug!("Progress: {} pages saved, {} targets queued", pages, queue.len());
            }
        }

        workers.abort_all();
        while workers.join_next().await.is_some() {}

        report.visited = ctx.visited.len();
        report.finish();

        tracing::info!(
            "Site crawl finished: {} pages, {} documents, {} failures, {} URLs visited",
            report.pages.len(),
            report.documents.len(),
            report.failures.len(),
            report.visited
        );

        Ok(report)
    }
}

/// Fires once each time the saved-page count reaches a new multiple of `every`
struct ProgressMilestone {
    every: usize,
    last: usize,
}

impl ProgressMilestone {
    fn new(every: usize) -> Self {
        Self { every, last: 0 }
    }

    fn reached(&mut self, pages: usize) -> bool {
        if pages == 0 || pages % self.every != 0 || pages == self.last {
            return false;
        }
        self.last = pages;
        true
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

async fn process_target(ctx: Arc<WorkerContext>, target: CrawlTarget) -> Result<TargetOutcome, HarvestError> {
    match target.kind {
        ContentKind::Page => process_page(&ctx, target).await,
        ContentKind::Document => process_document(&ctx, target).await,
    }
}

async fn process_page(ctx: &WorkerContext, target: CrawlTarget) -> Result<TargetOutcome, HarvestError> {
    if !ctx.visited.insert(&target.url) {
        return Ok(TargetOutcome::Skipped(SkipReason::AlreadyVisited));
    }

    tracing::debug!("Fetching page {} (depth {})", target.url, target.depth);
    let fetched = match ctx.fetcher.fetch(&target.url).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Error fetching {}: {}", target.url, e);
            return Ok(TargetOutcome::Failed(CrawlFailure::new(
                &target.url,
                ContentKind::Page,
                e.to_string(),
            )));
        }
    };

    if target.depth == 0 {
        if fetched.url.origin() != target.url.origin() {
            tracing::info!("Start page redirected to {}, using it as the crawl origin", fetched.url);
        }
        let _ = ctx.boundary.set(fetched.url.clone());
    } else if !same_origin(ctx.boundary(), &fetched.url) {
        tracing::debug!("{} redirected out of origin to {}", target.url, fetched.url);
        return Ok(TargetOutcome::Skipped(SkipReason::CrossOrigin));
    }

    // A redirect onto a URL another worker already claimed is a duplicate
    if canonicalize_url(&fetched.url) != canonicalize_url(&target.url) && !ctx.visited.insert(&fetched.url) {
        tracing::debug!("{} redirected to already visited {}", target.url, fetched.url);
        return Ok(TargetOutcome::Skipped(SkipReason::AlreadyVisited));
    }

    let parsed = parse_page(&fetched.text(), &fetched.url, &ctx.options.exclusion_selectors);

    let path = write_artifact(
        &ctx.htmls_dir,
        &page_filename(&target.url),
        parsed.cleaned_html.as_bytes(),
    )
    .await?;

    let boundary = ctx.boundary();
    let mut discovered = Vec::new();
    let mut cross_origin_links = 0;
    let mut over_depth_links = 0;
    let next_depth = target.depth + 1;

    for link in parsed.links {
        if !same_origin(boundary, &link) {
            cross_origin_links += 1;
            continue;
        }

        match classify(&link) {
            ContentKind::Document => discovered.push(CrawlTarget::document(link, target.depth)),
            ContentKind::Page => {
                if ctx.visited.contains(&link) {
                    continue;
                }
                if next_depth > ctx.options.max_depth {
                    over_depth_links += 1;
                } else {
                    discovered.push(CrawlTarget::page(link, next_depth));
                }
            }
        }
    }

    Ok(TargetOutcome::Page {
        artifact: SavedArtifact {
            url: target.url,
            path,
            kind: ContentKind::Page,
        },
        discovered,
        cross_origin_links,
        over_depth_links,
    })
}

async fn process_document(ctx: &WorkerContext, target: CrawlTarget) -> Result<TargetOutcome, HarvestError> {
    if !ctx.visited.insert(&target.url) {
        return Ok(TargetOutcome::Skipped(SkipReason::AlreadyVisited));
    }

    tracing::debug!("Downloading document {}", target.url);
    let fetched = match ctx.fetcher.fetch(&target.url).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Error downloading {}: {}", target.url, e);
            return Ok(TargetOutcome::Failed(CrawlFailure::new(
                &target.url,
                ContentKind::Document,
                e.to_string(),
            )));
        }
    };

    let path = write_artifact(&ctx.documents_dir, &document_filename(&target.url), &fetched.body).await?;

    Ok(TargetOutcome::Document(SavedArtifact {
        url: target.url,
        path,
        kind: ContentKind::Document,
    }))
}
