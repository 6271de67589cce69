//! Company entries on listing pages

use super::{base_url, clean, first_attr, first_text, Extractor};
use crate::crawler::FetchedPage;
use crate::model::Organization;
use crate::url::resolve_href;
use scraper::{ElementRef, Html};
use url::Url;

/// Position of the location in the overview tag list
pub const LOCATION_TAG: usize = 0;

/// Position of the category in the overview tag list
pub const CATEGORY_TAG: usize = 1;

/// Position of the hiring-status marker in the overview tag list
pub const HIRING_TAG: usize = 2;

impl Extractor {
    /// Extracts every company entry on a listing page, in document order
    ///
    /// An empty result is the pagination end signal.
    pub fn extract_listing(&self, page: &FetchedPage) -> Vec<Organization> {
        let document = Html::parse_document(&page.body);
        let base = base_url(page);

        document
            .select(&self.listing_item)
            .map(|fragment| self.extract_organization(fragment, base.as_ref()))
            .collect()
    }

    /// Extracts the base fields of one company entry
    ///
    /// Map token and postings come from other pages and are left empty.
    /// Tags are assigned strictly by position, never by label.
    pub fn extract_organization(
        &self,
        fragment: ElementRef<'_>,
        base: Option<&Url>,
    ) -> Organization {
        let href = fragment.value().attr("href").unwrap_or_default();

        let (title, logo_url, tags) = match fragment.select(&self.overview_meta).next() {
            Some(meta) => {
                let tags: Vec<String> = meta
                    .select(&self.overview_tags)
                    .map(|tag| clean(&tag.text().collect::<String>()))
                    .collect();
                (
                    clean(&first_text(&meta, &self.overview_title)),
                    first_attr(&meta, &self.overview_logo, "src"),
                    tags,
                )
            }
            None => (String::new(), String::new(), Vec::new()),
        };

        Organization {
            source_url: resolve_href(href, base),
            map_token: String::new(),
            title,
            logo_url,
            location: tag_at(&tags, LOCATION_TAG),
            category: tag_at(&tags, CATEGORY_TAG),
            is_hiring: tag_at(&tags, HIRING_TAG) == self.markers.hiring,
            postings: Vec::new(),
        }
    }
}

/// Tag at `index`, or an empty string if the list is shorter
fn tag_at(tags: &[String], index: usize) -> String {
    tags.get(index).cloned().unwrap_or_default()
}
