//! HTML parser for cleaning pages and extracting links
//!
//! This module handles parsing HTML content to:
//! - Remove boilerplate elements matched by exclusion selectors
//! - Extract hyperlinks resolved against the page URL
//! - Locate the careers anchor and document-marked anchors
//!
//! `scraper::Html` is not `Send`, so every function here parses and drops
//! the document synchronously.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Serialized HTML with excluded elements removed
    pub cleaned_html: String,

    /// Unique links found on the page (absolute URLs, in document order)
    pub links: Vec<Url>,
}

/// Parses a page, collects its links and strips excluded elements
///
/// Links are collected before exclusion: navigation and footer links are
/// still followed even though those elements are not saved.
///
/// # Example
///
/// ```
/// use company_harvester::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><header><a href="/about">About</a></header><p>Body</p></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &base_url, &["header".to_string()]);
///
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/about");
/// assert!(!parsed.cleaned_html.contains("<header>"));
/// ```
pub fn parse_page(html: &str, base_url: &Url, exclusion_selectors: &[String]) -> ParsedPage {
    let mut document = Html::parse_document(html);

    let links = extract_links(&document, base_url);
    remove_excluded(&mut document, exclusion_selectors);

    ParsedPage {
        cleaned_html: document.html(),
        links,
    }
}

/// Collects every HTTP(S) link on a page
pub fn extract_page_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    extract_links(&document, base_url)
}

/// Finds the first anchor whose visible text satisfies `matches`
///
/// Anchor text is trimmed and inner whitespace collapsed before matching.
/// Returns the resolved href.
pub fn find_anchor_by_text<F>(html: &str, base_url: &Url, matches: F) -> Option<Url>
where
    F: Fn(&str) -> bool,
{
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").ok()?;

    document
        .select(&selector)
        .filter(|element| matches(&visible_text(element)))
        .find_map(|element| {
            element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
        })
}

/// Collects HTTP(S) links from anchors carrying the given class
pub fn extract_marked_links(html: &str, base_url: &Url, class: &str) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter(|element| element.value().classes().any(|c| c == class))
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|url| seen.insert(url.to_string()))
        .collect()
}

/// Extracts all valid, de-duplicated links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|url| seen.insert(url.to_string()))
        .collect()
}

/// Detaches every element matching one of the selectors
fn remove_excluded(document: &mut Html, selectors: &[String]) {
    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Skipping invalid exclusion selector '{}': {:?}", raw, e);
                continue;
            }
        };

        let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

fn visible_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
