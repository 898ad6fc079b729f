use crate::config::{QueryPolicy, SiteRules};
use crate::UrlError;
use url::Url;

/// Tracking query parameters removed under the generic cleaning policy
///
/// Any parameter starting with `utm_` is removed as well.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "msclkid",
    "ref",
    "source",
    "intcmp",
    "cmp",
    "mc_cid",
    "mc_eid",
    "sb_referer_host",
    "_hsenc",
    "_hsmi",
    "_ga",
    "form",
    "lang",
];

/// Resolves an href to an absolute URL
///
/// Strips everything after `#`, then resolves relative references against
/// `base` using standard relative-URL resolution.
///
/// # Arguments
///
/// * `href` - The raw href value, absolute or relative
/// * `base` - The URL of the page the href was found on
///
/// # Returns
///
/// * `Ok(String)` - The absolute URL
/// * `Err(UrlError)` - The base or the reference could not be parsed
pub fn normalize(href: &str, base: &str) -> Result<String, UrlError> {
    let href = href.split('#').next().unwrap_or("");

    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }

    let base_url = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;
    let resolved = base_url
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(resolved.to_string())
}

/// Canonicalizes a URL by applying the site's query-parameter policy
///
/// The rule table decides the policy per host; hosts without a rule get the
/// generic tracking-parameter deny-list. The fragment is always dropped and
/// the relative order of surviving parameters is preserved.
///
/// Idempotent: `clean(clean(u)) == clean(u)`.
pub fn clean(url_str: &str, rules: &SiteRules) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    let host = url
        .host_str()
        .ok_or(UrlError::MissingDomain)?
        .to_lowercase();

    let policy = rules
        .get(&host)
        .map(|rule| rule.query_policy.clone())
        .unwrap_or_default();

    url.set_fragment(None);

    let kept: Vec<(String, String)> = match &policy {
        QueryPolicy::StripAll => Vec::new(),
        QueryPolicy::KeepOnly(names) => url
            .query_pairs()
            .filter(|(key, _)| names.iter().any(|n| n == key))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        QueryPolicy::Generic => url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        drop(pairs);
    }

    Ok(url.to_string())
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}
