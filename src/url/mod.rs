//! URL handling module for the harvester
//!
//! This module provides content classification by extension, URL
//! canonicalization for visited-set membership, origin scoping, and the
//! URL-to-filename rules used by the output layout.

mod domain;
mod filename;
mod normalize;

use ::url::Url;

// Re-export main functions
pub use domain::{company_name, same_origin};
pub use filename::{careers_document_filename, careers_link_filename, document_filename, page_filename, safe_filename};
pub use normalize::{canonicalize_url, parse_seed_url};

/// File extensions that mark a link as a downloadable document
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx"];

/// What a resolved link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Binary document, downloaded and never traversed
    Document,
    /// HTML page, traversed further
    Page,
}

impl ContentKind {
    /// Returns true if the link is terminal (downloaded, not recursed into)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Document)
    }
}

/// Classifies a URL as a document or a page by its path extension
///
/// Only the path is inspected; query strings and fragments never change the
/// result. The comparison ignores case.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use company_harvester::url::{classify, ContentKind};
///
/// let url = Url::parse("https://example.com/files/report.pdf?v=2").unwrap();
/// assert_eq!(classify(&url), ContentKind::Document);
///
/// let url = Url::parse("https://example.com/about").unwrap();
/// assert_eq!(classify(&url), ContentKind::Page);
/// ```
pub fn classify(url: &Url) -> ContentKind {
    let path = url.path().to_ascii_lowercase();

    if DOCUMENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        ContentKind::Document
    } else {
        ContentKind::Page
    }
}
