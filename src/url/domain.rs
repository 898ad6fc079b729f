use url::Url;

/// Extracts the lowercase host from a URL string
///
/// # Examples
///
/// ```
/// use kb_harvest::url::extract_domain;
///
/// assert_eq!(
///     extract_domain("https://WWW.Example.ORG/path"),
///     Some("www.example.org".to_string())
/// );
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Checks whether a URL belongs to the crawled site
///
/// A link counts as internal when its host equals the base domain exactly,
/// or when the two differ only by a `www.` prefix.
pub fn is_internal_link(url_str: &str, base_domain: &str) -> bool {
    let Some(domain) = extract_domain(url_str) else {
        return false;
    };

    domain == base_domain
        || domain == format!("www.{}", base_domain)
        || format!("www.{}", domain) == base_domain
}
