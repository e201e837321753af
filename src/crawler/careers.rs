//! Careers sub-crawl
//!
//! Fetches the start page, looks for the careers anchor, then captures the
//! careers page one hop deep: every link on it is saved under
//! `<name>_careers_scraped_data/links/`, and anchors carrying the document
//! class are downloaded into `documents/`. No recursion past that page.

use crate::config::{CareersConfig, MatchMode};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{extract_marked_links, extract_page_links, find_anchor_by_text};
use crate::crawler::report::{CrawlFailure, SavedArtifact};
use crate::output::{ensure_dir, write_artifact, SiteLayout};
use crate::url::{careers_document_filename, careers_link_filename, ContentKind};
use crate::HarvestError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Decides whether an anchor's visible text names the careers page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareersMatcher {
    /// Text equals one of the keywords
    Exact(Vec<String>),
    /// Text contains one of the keywords, ignoring case
    Contains(Vec<String>),
}

impl Default for CareersMatcher {
    fn default() -> Self {
        Self::Exact(vec!["Careers".to_string()])
    }
}

impl CareersMatcher {
    pub fn from_config(config: &CareersConfig) -> Self {
        let keywords: Vec<String> = config
            .link_text
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        match config.match_mode {
            MatchMode::Exact => Self::Exact(keywords),
            MatchMode::Contains => {
                Self::Contains(keywords.into_iter().map(|k| k.to_lowercase()).collect())
            }
        }
    }

    /// `text` is expected to be trimmed with whitespace collapsed
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(keywords) => keywords.iter().any(|k| k == text),
            Self::Contains(keywords) => {
                let text = text.to_lowercase();
                keywords.iter().any(|k| text.contains(k.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CareersOptions {
    pub matcher: CareersMatcher,
    /// Class attribute marking document anchors on the careers page
    pub document_class: String,
}

impl Default for CareersOptions {
    fn default() -> Self {
        Self {
            matcher: CareersMatcher::default(),
            document_class: "document".to_string(),
        }
    }
}

impl CareersOptions {
    pub fn from_config(config: &CareersConfig) -> Self {
        Self {
            matcher: CareersMatcher::from_config(config),
            document_class: config.document_class.clone(),
        }
    }
}

/// What the careers sub-crawl captured
#[derive(Debug, Clone)]
pub struct CareersRecord {
    pub careers_url: Url,
    pub links: Vec<SavedArtifact>,
    pub documents: Vec<SavedArtifact>,
    pub failures: Vec<CrawlFailure>,
    /// True if the crawl stopped before every link was fetched
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub enum CareersReport {
    /// The start page has no careers anchor; nothing was written
    NotFound,
    Found(CareersRecord),
}

impl CareersReport {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// One-hop crawler for a site's careers page
pub struct CareersCrawler {
    fetcher: Arc<dyn PageFetcher>,
    options: CareersOptions,
}

impl CareersCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: CareersOptions) -> Self {
        Self { fetcher, options }
    }

    /// Runs the careers sub-crawl from `start`
    ///
    /// # Returns
    ///
    /// * `Ok(CareersReport::NotFound)` - No careers anchor on the start page
    /// * `Ok(CareersReport::Found(_))` - Careers page captured; individual
    ///   link failures are listed in the record
    /// * `Err(HarvestError)` - The start or careers page could not be fetched,
    ///   or output could not be written
    pub async fn crawl(&self, start: &Url, layout: &SiteLayout) -> Result<CareersReport, HarvestError> {
        self.crawl_with_cancellation(start, layout, CancellationToken::new())
            .await
    }

    /// Runs the careers sub-crawl, stopping between fetches when `cancel` fires
    ///
    /// Links not yet fetched at cancellation are dropped and the record is
    /// returned with `cancelled` set.
    pub async fn crawl_with_cancellation(
        &self,
        start: &Url,
        layout: &SiteLayout,
        cancel: CancellationToken,
    ) -> Result<CareersReport, HarvestError> {
        let home = self.fetcher.fetch(start).await?;

        let matcher = &self.options.matcher;
        let Some(careers_url) = find_anchor_by_text(&home.text(), &home.url, |text| matcher.matches(text)) else {
            tracing::info!("No careers link found on {}", home.url);
            return Ok(CareersReport::NotFound);
        };

        tracing::info!("Found careers page at {}", careers_url);
        let careers_page = self.fetcher.fetch(&careers_url).await?;
        let body = careers_page.text();
        let links = extract_page_links(&body, &careers_page.url);
        let marked = extract_marked_links(&body, &careers_page.url, &self.options.document_class);

        let links_dir = layout.careers_links_dir();
        let documents_dir = layout.careers_documents_dir();
        ensure_dir(&links_dir)?;
        ensure_dir(&documents_dir)?;

        let mut record = CareersRecord {
            careers_url,
            links: Vec::new(),
            documents: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
        };

        for link in links {
            if cancel.is_cancelled() {
                record.cancelled = true;
                break;
            }
            match self.fetcher.fetch(&link).await {
                Ok(fetched) => {
                    let path = write_artifact(
                        &links_dir,
                        &careers_link_filename(&link),
                        fetched.text().as_bytes(),
                    )
                    .await?;
                    record.links.push(SavedArtifact {
                        url: link,
                        path,
                        kind: ContentKind::Page,
                    });
                }
                Err(e) => {
                    tracing::warn!("Error fetching careers link {}: {}", link, e);
                    record
                        .failures
                        .push(CrawlFailure::new(&link, ContentKind::Page, e.to_string()));
                }
            }
        }

        for link in marked {
            if cancel.is_cancelled() {
                record.cancelled = true;
                break;
            }
            match self.fetcher.fetch(&link).await {
                Ok(fetched) => {
                    let path =
                        write_artifact(&documents_dir, &careers_document_filename(&link), &fetched.body).await?;
                    record.documents.push(SavedArtifact {
                        url: link,
                        path,
                        kind: ContentKind::Document,
                    });
                }
                Err(e) => {
                    tracing::warn!("Error downloading careers document {}: {}", link, e);
                    record
                        .failures
                        .push(CrawlFailure::new(&link, ContentKind::Document, e.to_string()));
                }
            }
        }

        tracing::info!(
            "Careers crawl saved {} links and {} documents ({} failures)",
            record.links.len(),
            record.documents.len(),
            record.failures.len()
        );

        Ok(CareersReport::Found(record))
    }
}
