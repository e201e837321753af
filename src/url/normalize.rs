use crate::UrlError;
use url::Url;

/// List of tracking query parameters dropped during canonicalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Parses a user-supplied seed URL
///
/// Bare hosts such as `example.com` are accepted and given an `https://`
/// scheme. Only HTTP(S) URLs with a host are valid seeds.
///
/// # Examples
///
/// ```
/// use company_harvester::url::parse_seed_url;
///
/// let url = parse_seed_url("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn parse_seed_url(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Produces the canonical form of a URL used as its visited-set key
///
/// # Canonicalization Steps
///
/// 1. Remove the fragment
/// 2. Host is lowercased (the parser already does this)
/// 3. Collapse repeated slashes; drop the trailing slash except for the root
/// 4. Remove tracking query parameters and sort the remaining ones
/// 5. Remove an empty query string
///
/// Scheme, `www.` and port are kept: they are part of the crawl origin.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use company_harvester::url::canonicalize_url;
///
/// let a = canonicalize_url(&Url::parse("https://Example.com/about/#team").unwrap());
/// let b = canonicalize_url(&Url::parse("https://example.com/about").unwrap());
/// assert_eq!(a, b);
/// ```
pub fn canonicalize_url(url: &Url) -> Url {
    let mut url = url.clone();

    url.set_fragment(None);

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    url
}

/// Collapses empty segments and removes the trailing slash (except for root)
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort();
    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
