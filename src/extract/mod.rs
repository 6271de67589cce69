//! Entity extraction from fetched listing, job list and profile pages
//!
//! Extraction is selector driven and never fails: a node that is missing from
//! the markup yields an empty string or `false`. All CSS selectors are compiled
//! once in [`Extractor::new`].
//!
//! Parsed documents are confined to the synchronous methods of this module so
//! that no `scraper::Html` is ever held across an `.await` in the crawler.

mod normalize;
mod organization;
mod posting;

pub use normalize::{
    classify_employment, clean, is_expired, Markers, DEFAULT_EXPIRY_MARKER, DEFAULT_HIRING_MARKER,
};
pub use organization::{CATEGORY_TAG, HIRING_TAG, LOCATION_TAG};

use crate::crawler::FetchedPage;
use crate::url::map_token_from_href;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One company entry on a listing page
const LISTING_ITEM: &str = ".c-companyOverview";
const OVERVIEW_META: &str = ".c-companyOverview__meta";
const OVERVIEW_TITLE: &str = ".c-companyOverview__title";
const OVERVIEW_LOGO: &str = ".c-companyOverview__logo img.c-companyOverview__logoImage";
const OVERVIEW_TAGS: &str = ".c-companyOverview__tags span";

/// One posting on a company job list
const POSTING_ITEM: &str = ".o-listView__itemInfo";
const POSTING_LINK: &str = "h3.c-jobListView__title a.c-jobListView__titleLink";
const POSTING_ELAPSED: &str = "h3.c-jobListView__title span.c-jobListView__passedDays";
const POSTING_META: &str = "ul.c-jobListView__meta li.c-jobListView__metaItem";

/// Map link on a company profile
const MAP_LINK: &str = ".c-companyMap__mapLink";

/// Compiled selectors plus the markers to compare against
#[derive(Debug)]
pub struct Extractor {
    markers: Markers,
    listing_item: Selector,
    overview_meta: Selector,
    overview_title: Selector,
    overview_logo: Selector,
    overview_tags: Selector,
    posting_item: Selector,
    posting_link: Selector,
    posting_elapsed: Selector,
    posting_meta: Selector,
    map_link: Selector,
}

impl Extractor {
    /// Compiles the selectors
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::Selector` if a selector fails to parse.
    pub fn new(markers: Markers) -> Result<Self, HarvestError> {
        Ok(Self {
            markers,
            listing_item: compile(LISTING_ITEM)?,
            overview_meta: compile(OVERVIEW_META)?,
            overview_title: compile(OVERVIEW_TITLE)?,
            overview_logo: compile(OVERVIEW_LOGO)?,
            overview_tags: compile(OVERVIEW_TAGS)?,
            posting_item: compile(POSTING_ITEM)?,
            posting_link: compile(POSTING_LINK)?,
            posting_elapsed: compile(POSTING_ELAPSED)?,
            posting_meta: compile(POSTING_META)?,
            map_link: compile(MAP_LINK)?,
        })
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Extracts the map token from a company profile page
    ///
    /// A profile without a map link is normal and yields an empty string.
    pub fn extract_map_token(&self, page: &FetchedPage) -> String {
        let document = Html::parse_document(&page.body);

        document
            .select(&self.map_link)
            .next()
            .and_then(|element| element.value().attr("href"))
            .map(map_token_from_href)
            .unwrap_or_default()
    }
}

/// Compiles a CSS selector
fn compile(css: &str) -> Result<Selector, HarvestError> {
    Selector::parse(css).map_err(|e| HarvestError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Parses the final URL of a page for resolving relative hrefs
fn base_url(page: &FetchedPage) -> Option<Url> {
    Url::parse(&page.final_url).ok()
}

/// Concatenated text of the first match of `selector` under `element`
fn first_text(element: &ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>())
        .unwrap_or_default()
}

/// Attribute of the first match of `selector` under `element`
fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    element
        .select(selector)
        .next()
        .and_then(|found| found.value().attr(attr))
        .map(str::to_string)
        .unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::test_support::page;
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(Markers::default()).unwrap()
    }

    #[test]
    fn test_all_selectors_compile() {
        assert!(Extractor::new(Markers::default()).is_ok());
    }

    #[test]
    fn test_invalid_selector_reports_error() {
        let err = compile("div[[").unwrap_err();
        assert!(matches!(err, HarvestError::Selector { selector, .. } if selector == "div[["));
    }

    #[test]
    fn test_extract_map_token() {
        let html = r#"<html><body>
            <div class="c-companyMap">
                <a class="c-companyMap__mapLink" href="https://maps.example.com/?q=35.7219,51.3347&z=15">Map</a>
            </div>
        </body></html>"#;

        let token = extractor().extract_map_token(&page("https://jobinja.ir/companies/acme", html));
        assert_eq!(token, "35.7219,51.3347");
    }

    #[test]
    fn test_missing_map_link_yields_empty_token() {
        let html = r#"<html><body><div class="c-companyMap"></div></body></html>"#;
        let token = extractor().extract_map_token(&page("https://jobinja.ir/companies/acme", html));
        assert_eq!(token, "");
    }

    #[test]
    fn test_map_link_without_query_yields_empty_token() {
        let html = r#"<a class="c-companyMap__mapLink" href="https://maps.example.com/">Map</a>"#;
        let token = extractor().extract_map_token(&page("https://jobinja.ir/companies/acme", html));
        assert_eq!(token, "");
    }
}
