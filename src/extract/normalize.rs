//! Text cleanup and marker matching for extracted fragments

use crate::model::EmploymentType;

/// Elapsed label the source shows on postings that no longer accept applications
pub const DEFAULT_EXPIRY_MARKER: &str = "(منقضی شده)";

/// Third overview tag of a company that is currently hiring
pub const DEFAULT_HIRING_MARKER: &str = "در حال استخدام";

/// Keywords recognised in posting metadata, checked in this order
const EMPLOYMENT_KEYWORDS: &[(EmploymentType, &[&str])] = &[
    (EmploymentType::Remote, &["دورکاری", "remote"]),
    (EmploymentType::Internship, &["کارآموزی", "internship"]),
    (
        EmploymentType::PartTime,
        &["پاره وقت", "پاره‌وقت", "part-time", "part time"],
    ),
    (
        EmploymentType::FullTime,
        &["تمام وقت", "تمام‌وقت", "full-time", "full time"],
    ),
];

/// Marker strings the extractor compares cleaned text against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub expiry: String,
    pub hiring: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            expiry: DEFAULT_EXPIRY_MARKER.to_string(),
            hiring: DEFAULT_HIRING_MARKER.to_string(),
        }
    }
}

impl From<&crate::config::ExtractConfig> for Markers {
    fn from(config: &crate::config::ExtractConfig) -> Self {
        Self {
            expiry: config.expiry_marker.clone(),
            hiring: config.hiring_marker.clone(),
        }
    }
}

/// Trims surrounding whitespace, newlines included
///
/// Cleaning is idempotent: `clean(&clean(s)) == clean(s)`.
pub fn clean(text: &str) -> String {
    text.trim().to_string()
}

/// Returns true if the elapsed label is exactly the expiry marker once cleaned
pub fn is_expired(elapsed_label: &str, marker: &str) -> bool {
    clean(elapsed_label) == marker
}

/// Classifies a posting from its metadata list items
///
/// Items are scanned in document order and the first one containing a known
/// keyword decides the type. ASCII keywords match case-insensitively.
pub fn classify_employment<S: AsRef<str>>(items: &[S]) -> EmploymentType {
    for item in items {
        let item = clean(item.as_ref()).to_lowercase();
        for (kind, keywords) in EMPLOYMENT_KEYWORDS {
            if keywords.iter().any(|keyword| item.contains(keyword)) {
                return *kind;
            }
        }
    }
    EmploymentType::Unknown
}
