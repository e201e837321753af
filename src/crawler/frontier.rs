//! Crawl targets and the shared visited set

use crate::url::{canonicalize_url, ContentKind};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// A URL waiting to be processed, with its traversal context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// The resolved URL
    pub url: Url,

    /// Page hops from the seed URL
    pub depth: u32,

    /// Whether the URL is traversed or downloaded
    pub kind: ContentKind,
}

impl CrawlTarget {
    pub fn page(url: Url, depth: u32) -> Self {
        Self {
            url,
            depth,
            kind: ContentKind::Page,
        }
    }

    /// Documents are terminal; `depth` is the depth of the page linking to them
    pub fn document(url: Url, depth: u32) -> Self {
        Self {
            url,
            depth,
            kind: ContentKind::Document,
        }
    }
}

/// Per-crawl record of canonical URLs already claimed by a worker
///
/// [`VisitedSet::insert`] tests and inserts under one lock, so two workers can
/// never both claim the same URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL. Returns false if it (or a canonical equivalent) was already claimed.
    pub fn insert(&self, url: &Url) -> bool {
        let key = canonicalize_url(url).to_string();
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key)
    }

    /// Non-claiming membership check
    pub fn contains(&self, url: &Url) -> bool {
        let key = canonicalize_url(url).to_string();
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
