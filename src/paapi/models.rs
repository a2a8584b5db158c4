//! PA-API wire types and the product records built from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Resources requested from SearchItems. Anything not listed here is absent from
/// the response.
pub const SEARCH_RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "Offers.Listings.Price",
    "Offers.Listings.Availability.Message",
    "Images.Primary.Small",
];

/// SearchItems request payload. Field order is the serialized order, which is
/// what gets hashed into the signature.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItemsRequest {
    pub keywords: String,
    pub marketplace: String,
    pub partner_tag: String,
    pub partner_type: String,
    pub resources: Vec<String>,
    pub search_index: String,
    /// Lowest currency denomination (cents for USD).
    pub max_price: u64,
    pub item_page: u32,
    pub item_count: u32,
    pub availability: String,
}

/// SearchItems response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItemsResponse {
    #[serde(default)]
    pub search_result: Option<SearchResult>,
    #[serde(default)]
    pub errors: Vec<ServiceError>,
}

impl SearchItemsResponse {
    /// Items of the result, empty when the search matched nothing.
    pub fn items(&self) -> &[Item] {
        self.search_result.as_ref().map(|r| r.items.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub total_result_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    #[serde(rename = "ASIN", default)]
    pub asin: String,
    #[serde(rename = "DetailPageURL", default)]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub item_info: Option<ItemInfo>,
    #[serde(default)]
    pub offers: Option<Offers>,
    #[serde(default)]
    pub images: Option<Images>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemInfo {
    #[serde(default)]
    pub title: Option<DisplayValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayValue {
    #[serde(default)]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offers {
    #[serde(default)]
    pub listings: Vec<OfferListing>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferListing {
    #[serde(default)]
    pub price: Option<OfferPrice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferPrice {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub display_amount: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Images {
    #[serde(default)]
    pub primary: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSet {
    #[serde(default)]
    pub small: Option<ImageRef>,
    #[serde(default)]
    pub medium: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

/// Displayed offer price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub amount: Decimal,
    /// Currency code (USD, EUR, etc.)
    pub currency: String,
    /// Preformatted amount from the API, e.g. `$49.99`
    pub display: Option<String>,
}

impl Price {
    /// Creates a price without a preformatted display string.
    pub fn simple(amount: Decimal, currency: impl Into<String>) -> Self {
        Self { amount, currency: currency.into(), display: None }
    }

    /// The API's display string, or a `$12.34`-style rendering of the amount.
    pub fn display_amount(&self) -> String {
        match &self.display {
            Some(display) if !display.trim().is_empty() => display.clone(),
            _ => {
                let amount = self.amount.round_dp(2);
                match self.currency.as_str() {
                    "USD" | "CAD" | "AUD" | "MXN" => format!("${:.2}", amount),
                    "" => format!("{:.2}", amount),
                    code => format!("{:.2} {}", amount, code),
                }
            }
        }
    }
}

/// One search result as returned by the API, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub asin: String,
    pub title: String,
    /// None when the item had no offer or no amount.
    pub price: Option<Price>,
    pub url: String,
    pub image_url: Option<String>,
}

impl Candidate {
    /// Promotes the candidate to a listing if it carries a usable price.
    pub fn into_listing(self) -> Option<Listing> {
        let price = self.price?;
        Some(Listing {
            asin: self.asin,
            title: self.title,
            price,
            url: self.url,
            image_url: self.image_url,
        })
    }
}

/// A priced product that made it onto the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    /// Amazon Standard Identification Number
    pub asin: String,
    pub title: String,
    pub price: Price,
    /// Detail page URL as returned by the API
    pub url: String,
    /// Thumbnail URL
    pub image_url: Option<String>,
}
