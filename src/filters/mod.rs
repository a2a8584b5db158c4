//! Filter & sort: turns API candidates into the ordered set shown on the page.

pub mod keyword;
pub mod price;

use crate::paapi::{Candidate, Listing};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

pub use keyword::KeywordFilter;
pub use price::PriceCeilingFilter;

/// Trait for filtering listings.
pub trait Filter: Send + Sync {
    /// Returns true if the listing passes the filter.
    fn matches(&self, listing: &Listing) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
///
/// Every chain starts with a [`PriceCeilingFilter`], so anything it accepts is
/// priced under the ceiling.
pub struct FilterChain {
    ceiling: PriceCeilingFilter,
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates a chain holding only the price ceiling.
    pub fn new(ceiling: Decimal) -> Self {
        Self { ceiling: PriceCeilingFilter::new(ceiling), filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// The exclusive price ceiling.
    pub fn ceiling(&self) -> Decimal {
        self.ceiling.ceiling()
    }

    /// Checks if a listing passes all filters.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.ceiling.matches(listing) && self.filters.iter().all(|f| f.matches(listing))
    }

    /// Returns descriptions of all filters, the ceiling first.
    pub fn descriptions(&self) -> Vec<String> {
        std::iter::once(self.ceiling.description())
            .chain(self.filters.iter().map(|f| f.description()))
            .collect()
    }
}

/// Builder for constructing a FilterChain from configuration.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Starts a chain with the exclusive price ceiling.
    pub fn new(ceiling: Decimal) -> Self {
        Self { chain: FilterChain::new(ceiling) }
    }

    /// Adds excluded keywords filter.
    pub fn exclude_keywords(mut self, keywords: Vec<String>) -> Self {
        let filter = KeywordFilter::excluded(keywords);
        if !filter.is_empty() {
            self.chain.add(filter);
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

/// Listings that passed every filter, ordered by ascending price.
///
/// Equal prices keep the order the API returned them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ListingSet {
    listings: Vec<Listing>,
}

impl ListingSet {
    /// Drops candidates without a price or failing `filters`, then sorts.
    pub fn select(candidates: Vec<Candidate>, filters: &FilterChain) -> Self {
        let mut listings: Vec<Listing> = candidates
            .into_iter()
            .filter_map(Candidate::into_listing)
            .filter(|listing| filters.matches(listing))
            .collect();

        // sort_by_key is stable
        listings.sort_by_key(|listing| listing.price.amount);

        Self { listings }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Listing> {
        self.listings.iter()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl<'a> IntoIterator for &'a ListingSet {
    type Item = &'a Listing;
    type IntoIter = std::slice::Iter<'a, Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.listings.iter()
    }
}

/// Removes repeated ASINs, keeping the first occurrence.
pub fn dedup_by_asin(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates.into_iter().filter(|c| seen.insert(c.asin.clone())).collect()
}
