use crate::url::canonicalize_url;
use sha2::{Digest, Sha256};
use url::Url;

/// Filename for a saved HTML snapshot: SHA-256 of the canonical URL
///
/// Fragment and trailing-slash variants of a URL map to the same file, and the
/// name is stable across runs.
pub fn page_filename(url: &Url) -> String {
    let canonical = canonicalize_url(url);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_str().as_bytes());
    format!("{}.html", hex::encode(hasher.finalize()))
}

/// Filename for a document found by the site crawler: the path basename
///
/// Falls back to a short hash when the basename is empty after sanitizing.
pub fn document_filename(url: &Url) -> String {
    let name = safe_filename(last_segment(url));
    if name.is_empty() || name.chars().all(|c| c == '.') {
        let mut hasher = Sha256::new();
        hasher.update(canonicalize_url(url).as_str().as_bytes());
        return format!("document-{}", &hex::encode(hasher.finalize())[..12]);
    }
    name
}

/// Filename for a page saved from the careers section
///
/// The last path segment with any `.html` removed, made filesystem-safe, with
/// `.html` appended. An empty segment becomes `index.html`.
pub fn careers_link_filename(url: &Url) -> String {
    let stem = safe_filename(&last_segment(url).replace(".html", ""));
    if stem.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}.html", stem)
    }
}

/// Filename for a document downloaded from the careers section
pub fn careers_document_filename(url: &Url) -> String {
    let name = safe_filename(last_segment(url));
    if name.is_empty() {
        "document".to_string()
    } else {
        name
    }
}

/// Keeps only characters that are valid in file names on every platform
///
/// # Examples
///
/// ```
/// use company_harvester::url::safe_filename;
///
/// assert_eq!(safe_filename("job:openings?.html"), "jobopenings.html");
/// ```
pub fn safe_filename(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn last_segment(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("")
}
