//! On-disk layout of a harvest
//!
//! ```text
//! <output>/<name>_scraped_data/
//! ├── htmls/<sha256>.html
//! ├── documents/<basename>
//! ├── <name>_careers_scraped_data/
//! │   ├── links/<safe>.html
//! │   └── documents/<safe>
//! ├── documents.txt
//! ├── all_html.txt
//! ├── careers.txt
//! └── summary.md
//! ```

use crate::url::company_name;
use crate::HarvestError;
use std::path::{Path, PathBuf};
use url::Url;

/// Paths for one crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    root: PathBuf,
    name: String,
}

impl SiteLayout {
    /// Uses `root` directly as the target folder
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    /// Layout for `seed` under `output_dir`: `<output_dir>/<name>_scraped_data`
    pub fn for_seed(output_dir: &Path, seed: &Url) -> Self {
        let name = company_name(seed);
        Self {
            root: output_dir.join(format!("{}_scraped_data", name)),
            name,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn htmls_dir(&self) -> PathBuf {
        self.root.join("htmls")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    pub fn careers_root(&self) -> PathBuf {
        self.root
            .join(format!("{}_careers_scraped_data", self.name))
    }

    pub fn careers_links_dir(&self) -> PathBuf {
        self.careers_root().join("links")
    }

    pub fn careers_documents_dir(&self) -> PathBuf {
        self.careers_root().join("documents")
    }

    pub fn documents_text(&self) -> PathBuf {
        self.root.join("documents.txt")
    }

    pub fn all_html_text(&self) -> PathBuf {
        self.root.join("all_html.txt")
    }

    pub fn careers_text(&self) -> PathBuf {
        self.root.join("careers.txt")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join("summary.md")
    }
}

/// Creates a directory and its parents if absent
pub fn ensure_dir(path: &Path) -> Result<(), HarvestError> {
    std::fs::create_dir_all(path).map_err(|e| HarvestError::filesystem(path, e))
}

/// Writes `contents` to `dir/filename`, replacing any previous file
pub async fn write_artifact(dir: &Path, filename: &str, contents: &[u8]) -> Result<PathBuf, HarvestError> {
    let path = dir.join(filename);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| HarvestError::filesystem(&path, e))?;
    Ok(path)
}
