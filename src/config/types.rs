use serde::Deserialize;

/// Main configuration structure for the harvester
///
/// Every section has defaults, so an empty file (or no file at all) is a valid
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub retry: RetryConfig,
    pub careers: CareersConfig,
    pub normalizer: NormalizerConfig,
    pub output: OutputConfig,
}

/// Site crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of page hops from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of concurrent crawl workers
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Overall crawl deadline (seconds); unlimited when absent
    #[serde(rename = "crawl-deadline-secs")]
    pub crawl_deadline_secs: Option<u64>,

    /// Disable TLS certificate verification
    #[serde(rename = "insecure-tls")]
    pub insecure_tls: bool,

    /// CSS selectors removed from every saved page
    #[serde(rename = "exclusion-selectors")]
    pub exclusion_selectors: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            concurrency: 8,
            request_timeout_secs: 30,
            crawl_deadline_secs: None,
            insecure_tls: false,
            exclusion_selectors: vec![
                "#main-nav".to_string(),
                ".footer".to_string(),
                "header".to_string(),
                "footer".to_string(),
            ],
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "company-harvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Retry policy configuration for the HTTP fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,

    /// Upper bound on any single delay (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

/// How anchor text is compared against the careers keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Trimmed anchor text must equal a keyword exactly
    #[default]
    Exact,
    /// Anchor text must contain a keyword, ignoring case
    Contains,
}

/// Careers sub-crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CareersConfig {
    /// Anchor texts that identify the careers link
    #[serde(rename = "link-text")]
    pub link_text: Vec<String>,

    #[serde(rename = "match-mode")]
    pub match_mode: MatchMode,

    /// Class attribute marking downloadable documents on the careers page
    #[serde(rename = "document-class")]
    pub document_class: String,
}

impl Default for CareersConfig {
    fn default() -> Self {
        Self {
            link_text: vec!["Careers".to_string()],
            match_mode: MatchMode::Exact,
            document_class: "document".to_string(),
        }
    }
}

/// Text normalizer configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Replaces the built-in English stop-word list when set
    #[serde(rename = "stop-words")]
    pub stop_words: Option<Vec<String>>,

    /// Added on top of the active stop-word list
    #[serde(rename = "extra-stop-words")]
    pub extra_stop_words: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which `<name>_scraped_data/` is created
    pub root: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
        }
    }
}
