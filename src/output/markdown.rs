//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a harvest:
//! run metadata, crawl counters, careers results, normalization outputs and
//! failures.

use crate::crawler::CareersReport;
use crate::pipeline::{CareersOutcome, HarvestSummary};
use crate::HarvestError;
use std::path::Path;

/// Failures listed in full before the rest are elided
const MAX_LISTED_FAILURES: usize = 50;

/// Writes the markdown summary to `output_path`
pub fn write_markdown_summary(summary: &HarvestSummary, output_path: &Path) -> Result<(), HarvestError> {
    let markdown = format_markdown_summary(summary);
    std::fs::write(output_path, markdown).map_err(|e| HarvestError::filesystem(output_path, e))
}

/// Formats a harvest summary as markdown
pub fn format_markdown_summary(summary: &HarvestSummary) -> String {
    let crawl = &summary.crawl;
    let mut md = String::new();

    md.push_str(&format!("# Harvest Summary: {}\n\n", summary.layout.name()));

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", crawl.start_url));
    md.push_str(&format!("- **Output**: {}\n", summary.layout.root().display()));
    md.push_str(&format!("- **Started**: {}\n", crawl.started_at.to_rfc3339()));
    if let Some(finished) = crawl.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = crawl.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    let status = if crawl.cancelled { "cancelled" } else { "completed" };
    md.push_str(&format!("- **Status**: {}\n", status));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Site crawl counters
    md.push_str("## Site Crawl\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Pages saved | {} |\n", crawl.pages.len()));
    md.push_str(&format!("| Documents saved | {} |\n", crawl.documents.len()));
    md.push_str(&format!("| Failed | {} |\n", crawl.failures.len()));
    md.push_str(&format!("| Over depth | {} |\n", crawl.skipped_over_depth));
    md.push_str(&format!("| Already visited | {} |\n", crawl.skipped_already_visited));
    md.push_str(&format!("| Cross-origin | {} |\n", crawl.skipped_cross_origin));
    md.push_str(&format!("| Unique URLs visited | {} |\n\n", crawl.visited));

    // Careers
    md.push_str("## Careers\n\n");
    match &summary.careers {
        CareersOutcome::Skipped => md.push_str("Skipped.\n\n"),
        CareersOutcome::Failed(message) => md.push_str(&format!("Failed: {}\n\n", message)),
        CareersOutcome::Report(CareersReport::NotFound) => {
            md.push_str("No careers link found on the start page.\n\n")
        }
        CareersOutcome::Report(CareersReport::Found(record)) => {
            md.push_str(&format!("- **Careers page**: {}\n", record.careers_url));
            md.push_str(&format!("- **Links saved**: {}\n", record.links.len()));
            md.push_str(&format!("- **Documents saved**: {}\n", record.documents.len()));
            md.push_str(&format!("- **Failed**: {}\n", record.failures.len()));
            if record.cancelled {
                md.push_str("- **Status**: cancelled\n");
            }
            md.push('\n');
        }
    }

    // Normalization
    if !summary.normalized.is_empty() {
        md.push_str("## Normalized Text\n\n");
        md.push_str("| File | Sources | Skipped | Words |\n");
        md.push_str("|------|---------|---------|-------|\n");
        for output in &summary.normalized {
            let name = output
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                name, output.files, output.failures, output.words
            ));
        }
        md.push('\n');
    }

    // Failures
    if !crawl.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Kind | Error |\n");
        md.push_str("|-----|------|-------|\n");
        for failure in crawl.failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "| {} | {:?} | {} |\n",
                failure.url,
                failure.kind,
                failure.message.replace('|', "\\|")
            ));
        }
        if crawl.failures.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                crawl.failures.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    md
}
