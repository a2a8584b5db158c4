//! Keyword-based title filtering.

use super::Filter;
use crate::paapi::Listing;

/// Drops listings whose title contains any excluded keyword (case-insensitive).
pub struct KeywordFilter {
    excluded: Vec<String>,
}

impl KeywordFilter {
    /// Creates a filter with only excluded keywords. Blank keywords are ignored.
    pub fn excluded(keywords: Vec<String>) -> Self {
        Self {
            excluded: keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}

impl Filter for KeywordFilter {
    fn matches(&self, listing: &Listing) -> bool {
        let title = listing.title.to_lowercase();
        !self.excluded.iter().any(|keyword| title.contains(keyword))
    }

    fn description(&self) -> String {
        if self.excluded.is_empty() {
            "Keywords: any".to_string()
        } else {
            format!("Must not contain: {}", self.excluded.join(", "))
        }
    }
}
