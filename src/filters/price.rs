//! Price ceiling filter.

use super::Filter;
use crate::paapi::Listing;
use rust_decimal::Decimal;

/// Keeps listings priced strictly below the ceiling.
pub struct PriceCeilingFilter {
    ceiling: Decimal,
}

impl PriceCeilingFilter {
    pub fn new(ceiling: Decimal) -> Self {
        Self { ceiling }
    }

    pub fn ceiling(&self) -> Decimal {
        self.ceiling
    }
}

impl Filter for PriceCeilingFilter {
    fn matches(&self, listing: &Listing) -> bool {
        listing.price.amount < self.ceiling
    }

    fn description(&self) -> String {
        format!("Price: < ${:.2}", self.ceiling)
    }
}
