//! Job postings on a company job list

use super::{base_url, classify_employment, clean, first_attr, first_text, is_expired, Extractor};
use crate::crawler::FetchedPage;
use crate::model::Posting;
use crate::url::resolve_href;
use scraper::{ElementRef, Html};
use url::Url;

impl Extractor {
    /// Extracts the non-expired postings of a job list page, in document order
    pub fn extract_postings(&self, page: &FetchedPage) -> Vec<Posting> {
        let document = Html::parse_document(&page.body);
        let base = base_url(page);

        document
            .select(&self.posting_item)
            .map(|fragment| self.extract_posting(fragment, base.as_ref()))
            .filter(|posting| !posting.is_expired)
            .collect()
    }

    /// Extracts one posting, expired or not
    pub fn extract_posting(&self, fragment: ElementRef<'_>, base: Option<&Url>) -> Posting {
        let href = first_attr(&fragment, &self.posting_link, "href");
        let elapsed_label = clean(&first_text(&fragment, &self.posting_elapsed));

        let meta_items: Vec<String> = fragment
            .select(&self.posting_meta)
            .map(|item| clean(&item.text().collect::<String>()))
            .collect();

        Posting {
            source_url: resolve_href(&href, base),
            title: clean(&first_text(&fragment, &self.posting_link)),
            is_expired: is_expired(&elapsed_label, &self.markers.expiry),
            elapsed_label,
            employment_type: classify_employment(&meta_items),
        }
    }
}
