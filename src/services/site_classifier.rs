use url::Url;

use crate::models::SiteId;

/// Host substring -> site. Matched against the lowercased host.
const SITE_REGISTRY: &[(&str, SiteId)] = &[
    ("amazon", SiteId::Amazon),
    ("flipkart", SiteId::Flipkart),
];

/// Resolves the retail site a product URL belongs to.
///
/// Returns `None` for unknown hosts and for anything that does not parse as an
/// absolute URL with a host.
pub fn classify(url: &str) -> Option<SiteId> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    SITE_REGISTRY
        .iter()
        .find(|(needle, _)| host.contains(needle))
        .map(|(_, site)| *site)
}
