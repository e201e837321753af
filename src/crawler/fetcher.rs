//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and TLS policy
//! - Single GET requests with a per-request timeout
//! - Error classification into [`FetchError`] variants
//!
//! Retry behavior lives in [`crate::crawler::retry`], which wraps any
//! [`PageFetcher`].

use crate::config::Config;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything that can GET a URL for the crawlers
///
/// Crawlers hold an `Arc<dyn PageFetcher>` so the transport and retry policy
/// are chosen by the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, returning the body on a 2xx response
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError>;
}

/// Options for building the HTTP client
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification
    pub insecure_tls: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            insecure_tls: false,
            user_agent: format!("company-harvester/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherOptions {
    /// Derives fetcher options from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.crawler.request_timeout_secs),
            insecure_tls: config.crawler.insecure_tls,
            user_agent: format!(
                "{}/{}",
                config.user_agent.crawler_name, config.user_agent.crawler_version
            ),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Certificate verification stays on unless `insecure_tls` is set, in which
/// case a warning is logged every time a client is built.
///
/// # Example
///
/// ```no_run
/// use company_harvester::crawler::{build_http_client, FetcherOptions};
///
/// let client = build_http_client(&FetcherOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &FetcherOptions) -> Result<Client, reqwest::Error> {
    if options.insecure_tls {
        tracing::warn!("TLS certificate verification is disabled for this crawl");
    }

    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(options.insecure_tls)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single-attempt fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(options: &FetcherOptions) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(options)?,
        })
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        Ok(FetchedResource {
            url: final_url,
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

fn classify_transport_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
