//! Output module for the on-disk harvest layout and run summaries
//!
//! This module handles:
//! - Locating every output directory and file for a crawl target
//! - Writing captured artifacts
//! - Generating the markdown summary of a harvest

mod layout;
mod markdown;

pub use layout::{ensure_dir, write_artifact, SiteLayout};
pub use markdown::{format_markdown_summary, write_markdown_summary};
