//! URL handling module for Company-Harvester
//!
//! This module expands the configured URL templates, derives company ids from
//! profile links, and resolves relative hrefs found in fetched pages.

use crate::config::SiteConfig;
use url::Url;

/// Placeholder for the page number in the listing URL template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Placeholder for the company id in the profile URL templates
pub const ID_PLACEHOLDER: &str = "{id}";

/// Company id the listing yields for profiles that are not fully set up
///
/// Such entries link to their job list instead of a profile, so the last
/// path segment of their href is `jobs`.
pub const INCOMPLETE_PROFILE_ID: &str = "jobs";

/// Returns the URL of listing page `page`
pub fn listing_page_url(site: &SiteConfig, page: u32) -> String {
    site.listing_url
        .replace(PAGE_PLACEHOLDER, &page.to_string())
}

/// Returns the profile page URL of the company with the given id
pub fn organization_url(site: &SiteConfig, id: &str) -> String {
    site.organization_url.replace(ID_PLACEHOLDER, id)
}

/// Returns the job list URL of the company with the given id
pub fn organization_jobs_url(site: &SiteConfig, id: &str) -> String {
    site.organization_jobs_url.replace(ID_PLACEHOLDER, id)
}

/// Derives a company id from its profile link
///
/// The id is the last non-empty path segment. Query strings, fragments and
/// trailing slashes are ignored. Relative hrefs are handled the same way.
///
/// # Examples
///
/// ```
/// use company_harvester::url::organization_id;
///
/// assert_eq!(organization_id("https://jobinja.ir/companies/acme"), "acme");
/// assert_eq!(organization_id("/companies/acme/jobs/"), "jobs");
/// ```
pub fn organization_id(href: &str) -> String {
    let href = href.trim();

    let path = match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Returns true if the id marks a company without a complete profile
pub fn is_incomplete_profile(id: &str) -> bool {
    id == INCOMPLETE_PROFILE_ID
}

/// Resolves an href against the URL of the page it was found on
///
/// Absolute hrefs and hrefs that cannot be joined are returned trimmed but
/// otherwise unchanged.
pub fn resolve_href(href: &str, base: Option<&Url>) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    match base.map(|base| base.join(href)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => href.to_string(),
    }
}

/// Extracts the map token from a map link
///
/// The token is the raw value of the first query parameter, e.g. `35.7,51.4`
/// for `https://maps.example.com/?q=35.7,51.4&z=15`. It is opaque and kept
/// exactly as written, without percent or `+` decoding. Returns an empty
/// string if the link has no query or the first parameter has no value.
pub fn map_token_from_href(href: &str) -> String {
    let Some((_, query)) = href.split_once('?') else {
        return String::new();
    };

    query
        .split('#')
        .next()
        .and_then(|query| query.split('&').next())
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}
