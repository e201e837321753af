use url::Url;

/// Checks whether two URLs share an origin (scheme, host and port)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use company_harvester::url::same_origin;
///
/// let home = Url::parse("https://example.com/").unwrap();
/// assert!(same_origin(&home, &Url::parse("https://example.com/about").unwrap()));
/// assert!(!same_origin(&home, &Url::parse("https://blog.example.com/").unwrap()));
/// assert!(!same_origin(&home, &Url::parse("http://example.com/").unwrap()));
/// ```
pub fn same_origin(boundary: &Url, candidate: &Url) -> bool {
    boundary.origin() == candidate.origin()
}

/// Derives the short company name used to label output folders
///
/// The host has `www.`, `.com` and `.org` removed. A non-default port is
/// appended after an underscore so two local servers never share a folder.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use company_harvester::url::company_name;
///
/// let url = Url::parse("https://www.acme.com/about").unwrap();
/// assert_eq!(company_name(&url), "acme");
/// ```
pub fn company_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("site").to_lowercase();
    let name = host
        .replace("www.", "")
        .replace(".com", "")
        .replace(".org", "");

    match url.port() {
        Some(port) => format!("{}_{}", name, port),
        None => name,
    }
}
