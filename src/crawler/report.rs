//! Crawl result types
//!
//! A [`CrawlReport`] collects everything a site crawl produced: saved
//! artifacts, per-URL failures and skip counters. Failures never abort a
//! crawl, so a report always exists unless the filesystem failed.

use crate::crawler::frontier::CrawlTarget;
use crate::url::ContentKind;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use url::Url;

/// A captured unit of content written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// The URL the content was fetched from
    pub url: Url,
    /// Where it was written
    pub path: PathBuf,
    pub kind: ContentKind,
}

/// A URL that could not be captured
#[derive(Debug, Clone)]
pub struct CrawlFailure {
    pub url: String,
    pub kind: ContentKind,
    pub message: String,
}

impl CrawlFailure {
    pub fn new(url: &Url, kind: ContentKind, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Why a target was dropped without being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Canonical URL already claimed
    AlreadyVisited,
    /// Outside the crawl origin
    CrossOrigin,
}

/// What a worker did with one [`CrawlTarget`]
#[derive(Debug)]
pub enum TargetOutcome {
    /// Page saved; in-origin links discovered on it
    Page {
        artifact: SavedArtifact,
        discovered: Vec<CrawlTarget>,
        cross_origin_links: usize,
        /// In-origin page links one hop past `max_depth`, never queued
        over_depth_links: usize,
    },
    /// Document downloaded
    Document(SavedArtifact),
    Skipped(SkipReason),
    Failed(CrawlFailure),
}

/// Summary of one site crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub start_url: Url,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Saved HTML snapshots
    pub pages: Vec<SavedArtifact>,

    /// Downloaded documents
    pub documents: Vec<SavedArtifact>,

    pub failures: Vec<CrawlFailure>,

    pub skipped_over_depth: usize,
    pub skipped_already_visited: usize,
    pub skipped_cross_origin: usize,

    /// Size of the visited set when the crawl ended
    pub visited: usize,

    /// True if the crawl was cancelled or hit its deadline
    pub cancelled: bool,
}

impl CrawlReport {
    pub fn new(start_url: Url) -> Self {
        Self {
            start_url,
            started_at: Utc::now(),
            finished_at: None,
            pages: Vec::new(),
            documents: Vec::new(),
            failures: Vec::new(),
            skipped_over_depth: 0,
            skipped_already_visited: 0,
            skipped_cross_origin: 0,
            visited: 0,
            cancelled: false,
        }
    }

    /// Folds a worker outcome into the report, returning newly discovered targets
    pub fn record(&mut self, outcome: TargetOutcome) -> Vec<CrawlTarget> {
        match outcome {
            TargetOutcome::Page {
                artifact,
                discovered,
                cross_origin_links,
                over_depth_links,
            } => {
                self.skipped_cross_origin += cross_origin_links;
                self.skipped_over_depth += over_depth_links;
                self.pages.push(artifact);
                discovered
            }
            TargetOutcome::Document(artifact) => {
                self.documents.push(artifact);
                Vec::new()
            }
            TargetOutcome::Skipped(reason) => {
                match reason {
                    SkipReason::AlreadyVisited => self.skipped_already_visited += 1,
                    SkipReason::CrossOrigin => self.skipped_cross_origin += 1,
                }
                Vec::new()
            }
            TargetOutcome::Failed(failure) => {
                self.failures.push(failure);
                Vec::new()
            }
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Fetch attempts that reached a terminal result (saved or failed)
    pub fn fetched(&self) -> usize {
        self.pages.len() + self.documents.len() + self.failures.len()
    }
}
