//! Content normalizer
//!
//! Turns a directory of saved artifacts into one block of normalized text:
//! extract raw text per file, then tokenize, drop stop-words and lemmatize.

mod extract;
mod text;

pub use extract::{extract_text, html_to_text, pdf_to_text};
pub use text::TextPipeline;

use crate::HarvestError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions of saved HTML pages
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Extensions of downloaded documents whose text can be extracted
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Per-file extraction failures
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to extract PDF text from {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("Unsupported file type: {0}")]
    Unsupported(String),
}

/// Combined result of normalizing one directory
#[derive(Debug, Clone, Default)]
pub struct NormalizedText {
    /// Processed text of every file, one file per line
    pub text: String,

    /// Files that contributed, in processing order
    pub files: Vec<PathBuf>,

    /// Files skipped because extraction failed
    pub failures: Vec<(PathBuf, String)>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct Normalizer<'a> {
    pipeline: &'a TextPipeline,
    extensions: Vec<String>,
}

impl<'a> Normalizer<'a> {
    /// Normalizer over files whose extension (case-insensitive) is in `extensions`
    pub fn new<S: AsRef<str>>(pipeline: &'a TextPipeline, extensions: &[S]) -> Self {
        Self {
            pipeline,
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    fn is_eligible(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
                .unwrap_or(false)
    }

    /// Normalizes every eligible file in `dir`
    ///
    /// Files are processed in file-name order. A missing directory yields
    /// empty text; a file that fails extraction is logged and skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(NormalizedText)` - Combined text, possibly empty
    /// * `Err(HarvestError)` - The directory exists but could not be listed
    pub fn normalize_dir(&self, dir: &Path) -> Result<NormalizedText, HarvestError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Nothing to normalize in missing directory {}", dir.display());
                return Ok(NormalizedText::default());
            }
            Err(e) => return Err(HarvestError::filesystem(dir, e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HarvestError::filesystem(dir, e))?;
            let path = entry.path();
            if self.is_eligible(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut result = NormalizedText::default();
        let mut lines = Vec::with_capacity(paths.len());

        for path in paths {
            match extract_text(&path) {
                Ok(raw) => {
                    let processed = self.pipeline.process(&raw);
                    if !processed.is_empty() {
                        lines.push(processed);
                    }
                    result.files.push(path);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    result.failures.push((path, e.to_string()));
                }
            }
        }

        result.text = lines.join("\n");
        tracing::debug!(
            "Normalized {} files from {} ({} skipped)",
            result.files.len(),
            dir.display(),
            result.failures.len()
        );
        Ok(result)
    }
}

/// Writes normalized text to `path`
pub fn write_normalized(path: &Path, normalized: &NormalizedText) -> Result<(), HarvestError> {
    std::fs::write(path, &normalized.text).map_err(|e| HarvestError::filesystem(path, e))
}
