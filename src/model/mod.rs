//! Data model for harvested companies and their job postings
//!
//! Field names on the wire follow the JSON file the landing page reads
//! (`URL`, `Map`, `Jobs`, ...), so the Rust names and the serialized names differ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Employment type of a posting, derived from its metadata list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "is_fulltime")]
    FullTime,

    #[serde(rename = "internship")]
    Internship,

    #[serde(rename = "is_parttime")]
    PartTime,

    #[serde(rename = "remote")]
    Remote,

    /// No metadata item matched a known employment keyword
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl EmploymentType {
    /// Returns the serialized tag for this type
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::FullTime => "is_fulltime",
            Self::Internship => "internship",
            Self::PartTime => "is_parttime",
            Self::Remote => "remote",
            Self::Unknown => "",
        }
    }

    /// Returns true if the type could be classified
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            other => write!(f, "{}", other.as_tag()),
        }
    }
}

/// A single job advertisement belonging to an organization
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Posting {
    /// Link to the posting
    #[serde(rename = "URL")]
    pub source_url: String,

    #[serde(rename = "Title")]
    pub title: String,

    /// "Time since posted" label, cleaned
    #[serde(rename = "PassedDays")]
    pub elapsed_label: String,

    #[serde(rename = "IsExpired")]
    pub is_expired: bool,

    #[serde(rename = "Type", default)]
    pub employment_type: EmploymentType,
}

/// A company scraped from the listing site
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Organization {
    /// Link to the public company profile; also the source of the company id
    #[serde(rename = "URL")]
    pub source_url: String,

    /// Opaque map locator from the profile page, empty if the profile has no map
    #[serde(rename = "Map")]
    pub map_token: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Logo")]
    pub logo_url: String,

    /// First tag of the overview tag list
    #[serde(rename = "Location")]
    pub location: String,

    /// Second tag of the overview tag list
    #[serde(rename = "Category")]
    pub category: String,

    /// Third tag equals the hiring-status marker
    #[serde(rename = "Hiring")]
    pub is_hiring: bool,

    /// Non-expired postings, in page order
    #[serde(rename = "Jobs", default)]
    pub postings: Vec<Posting>,
}

/// The ordered collection of organizations produced by one crawl pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    organizations: Vec<Organization>,
}

impl Snapshot {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an organization, keeping encounter order
    pub fn push(&mut self, organization: Organization) {
        self.organizations.push(organization);
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Organization> {
        self.organizations.iter()
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    /// Total number of postings across all organizations
    pub fn posting_count(&self) -> usize {
        self.organizations.iter().map(|o| o.postings.len()).sum()
    }

    pub fn into_inner(self) -> Vec<Organization> {
        self.organizations
    }
}

impl From<Vec<Organization>> for Snapshot {
    fn from(organizations: Vec<Organization>) -> Self {
        Self { organizations }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Organization;
    type IntoIter = std::slice::Iter<'a, Organization>;

    fn into_iter(self) -> Self::IntoIter {
        self.organizations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_organization() -> Organization {
        Organization {
            source_url: "https://jobinja.ir/companies/acme".to_string(),
            map_token: "35.7,51.4".to_string(),
            title: "Acme".to_string(),
            logo_url: "https://cdn.example.com/acme.png".to_string(),
            location: "Tehran".to_string(),
            category: "Software".to_string(),
            is_hiring: true,
            postings: vec![Posting {
                source_url: "https://jobinja.ir/companies/acme/jobs/1".to_string(),
                title: "Backend Developer".to_string(),
                elapsed_label: "(3 days ago)".to_string(),
                is_expired: false,
                employment_type: EmploymentType::FullTime,
            }],
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample_organization()).unwrap();

        assert_eq!(json["URL"], "https://jobinja.ir/companies/acme");
        assert_eq!(json["Map"], "35.7,51.4");
        assert_eq!(json["Hiring"], true);
        assert_eq!(json["Jobs"][0]["PassedDays"], "(3 days ago)");
        assert_eq!(json["Jobs"][0]["IsExpired"], false);
        assert_eq!(json["Jobs"][0]["Type"], "is_fulltime");
    }

    #[test]
    fn test_unknown_employment_type_serializes_empty() {
        let json = serde_json::to_value(EmploymentType::Unknown).unwrap();
        assert_eq!(json, "");
        assert!(!EmploymentType::Unknown.is_known());
        assert!(EmploymentType::Remote.is_known());
    }

    #[test]
    fn test_snapshot_serializes_as_array() {
        let mut snapshot = Snapshot::new();
        snapshot.push(sample_organization());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_counts() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.is_empty());

        snapshot.push(sample_organization());
        snapshot.push(sample_organization());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.posting_count(), 2);
    }

    #[test]
    fn test_missing_type_defaults_to_unknown() {
        let json = r#"{"URL":"u","Title":"t","PassedDays":"p","IsExpired":false}"#;
        let posting: Posting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.employment_type, EmploymentType::Unknown);
    }
}
