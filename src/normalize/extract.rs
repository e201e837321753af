//! Raw text extraction from saved artifacts

use crate::normalize::ExtractError;
use scraper::{Html, Node};
use std::path::Path;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Extracts text from a saved file, dispatching on its extension
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match extension.as_str() {
        "html" | "htm" => Ok(html_to_text(&String::from_utf8_lossy(&bytes))),
        "pdf" => pdf_to_text(&bytes).map_err(|message| ExtractError::Pdf {
            path: path.to_path_buf(),
            message,
        }),
        _ => Err(ExtractError::Unsupported(path.display().to_string())),
    }
}

/// Visible text of an HTML document, whitespace-collapsed
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ")
}

/// Text layer of a PDF
///
/// `pdf-extract` panics on some malformed files, so the panic is caught and
/// reported as an extraction failure.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String, String> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text.split_whitespace().collect::<Vec<_>>().join(" ")),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("PDF parser panicked".to_string()),
    }
}
