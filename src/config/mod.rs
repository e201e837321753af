//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All sections are optional; missing keys fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use company_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CareersConfig, Config, CrawlerConfig, MatchMode, NormalizerConfig, OutputConfig,
    RetryConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
