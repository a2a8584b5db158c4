//! Turns SearchItems responses into candidate records.

use crate::error::ApiError;
use crate::paapi::models::{Candidate, Item, Price, SearchItemsResponse};
use crate::paapi::regions::Region;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, trace};

/// Parser for PA-API response bodies.
pub struct Parser {
    region: Region,
}

impl Parser {
    /// Creates a new parser for the given marketplace.
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Decodes a raw response body.
    pub fn decode(&self, body: &str) -> Result<SearchItemsResponse, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Extracts candidates in API order.
    ///
    /// Items without an offer price are kept with `price: None`; dropping them is
    /// the filter's job. Items without an ASIN are skipped.
    pub fn candidates(&self, response: &SearchItemsResponse) -> Vec<Candidate> {
        let candidates: Vec<Candidate> =
            response.items().iter().filter_map(|item| self.candidate(item)).collect();

        debug!(
            "Parsed {} candidates ({} items in response)",
            candidates.len(),
            response.items().len()
        );

        candidates
    }

    fn candidate(&self, item: &Item) -> Option<Candidate> {
        let asin = item.asin.trim();
        if asin.is_empty() {
            trace!("Skipping item without ASIN");
            return None;
        }

        let title = item
            .item_info
            .as_ref()
            .and_then(|info| info.title.as_ref())
            .and_then(|t| t.display_value.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        let url = match item.detail_page_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}/dp/{}", self.region.base_url(), asin),
        };

        let image_url = item
            .images
            .as_ref()
            .and_then(|images| images.primary.as_ref())
            .and_then(|primary| primary.small.as_ref().or(primary.medium.as_ref()))
            .and_then(|image| image.url.clone())
            .filter(|url| !url.is_empty());

        Some(Candidate { asin: asin.to_string(), title, price: self.price(item), url, image_url })
    }

    /// Price of the first offer listing, as PA-API orders the buy box first.
    fn price(&self, item: &Item) -> Option<Price> {
        let offer = item.offers.as_ref()?.listings.first()?.price.as_ref()?;
        let amount = to_decimal(offer.amount?)?;

        let currency = offer
            .currency
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.region.currency().to_string());

        Some(Price { amount, currency, display: offer.display_amount.clone() })
    }
}

/// Converts through the shortest decimal representation, so `99.99` stays `99.99`.
fn to_decimal(amount: f64) -> Option<Decimal> {
    if !amount.is_finite() {
        return None;
    }
    Decimal::from_str(&amount.to_string()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Vec<Candidate> {
        let parser = Parser::new(Region::Us);
        let response = parser.decode(body).unwrap();
        parser.candidates(&response)
    }

    #[test]
    fn test_full_item() {
        let body = r#"{
            "SearchResult": {
                "Items": [{
                    "ASIN": "B0TEST0001",
                    "DetailPageURL": "https://www.amazon.com/dp/B0TEST0001?tag=deals-20",
                    "Images": {"Primary": {"Small": {"URL": "https://m.media-amazon.com/images/I/a.jpg", "Height": 75, "Width": 75}}},
                    "ItemInfo": {"Title": {"DisplayValue": "  Studio DJ Headphones  ", "Label": "Title"}},
                    "Offers": {"Listings": [
                        {"Price": {"Amount": 99.99, "Currency": "USD", "DisplayAmount": "$99.99"}},
                        {"Price": {"Amount": 120.0, "Currency": "USD", "DisplayAmount": "$120.00"}}
                    ]}
                }],
                "TotalResultCount": 1
            }
        }"#;

        let candidates = parse(body);
        assert_eq!(candidates.len(), 1);

        let c = &candidates[0];
        assert_eq!(c.asin, "B0TEST0001");
        assert_eq!(c.title, "Studio DJ Headphones");
        assert_eq!(c.url, "https://www.amazon.com/dp/B0TEST0001?tag=deals-20");
        assert_eq!(c.image_url.as_deref(), Some("https://m.media-amazon.com/images/I/a.jpg"));

        let price = c.price.as_ref().unwrap();
        assert_eq!(price.amount, Decimal::new(9999, 2));
        assert_eq!(price.currency, "USD");
        assert_eq!(price.display.as_deref(), Some("$99.99"));
    }

    #[test]
    fn test_item_without_offers_has_no_price() {
        let body = r#"{"SearchResult":{"Items":[
            {"ASIN":"B0NOOFFER1","ItemInfo":{"Title":{"DisplayValue":"No offers"}}},
            {"ASIN":"B0NOAMOUNT","Offers":{"Listings":[{"Price":{"DisplayAmount":"See price in cart"}}]}},
            {"ASIN":"B0EMPTYLST","Offers":{"Listings":[]}}
        ]}}"#;

        let candidates = parse(body);
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.price.is_none()));
        assert_eq!(candidates[1].title, "");
    }

    #[test]
    fn test_missing_url_falls_back_to_dp_link() {
        let body = r#"{"SearchResult":{"Items":[{"ASIN":"B0TEST0002"}]}}"#;
        let candidates = parse(body);
        assert_eq!(candidates[0].url, "https://www.amazon.com/dp/B0TEST0002");
    }

    #[test]
    fn test_missing_currency_uses_region() {
        let body = r#"{"SearchResult":{"Items":[{"ASIN":"B0TEST0003","Offers":{"Listings":[{"Price":{"Amount":45}}]}}]}}"#;
        let candidates = parse(body);
        let price = candidates[0].price.as_ref().unwrap();
        assert_eq!(price.amount, Decimal::new(45, 0));
        assert_eq!(price.currency, "USD");
        assert!(price.display.is_none());
    }

    #[test]
    fn test_medium_image_fallback() {
        let body = r#"{"SearchResult":{"Items":[{"ASIN":"B0TEST0004","Images":{"Primary":{"Medium":{"URL":"https://img/m.jpg"}}}}]}}"#;
        let candidates = parse(body);
        assert_eq!(candidates[0].image_url.as_deref(), Some("https://img/m.jpg"));
    }

    #[test]
    fn test_empty_asin_skipped() {
        let body = r#"{"SearchResult":{"Items":[{"ASIN":""},{"ASIN":"B0TEST0005"}]}}"#;
        let candidates = parse(body);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].asin, "B0TEST0005");
    }

    #[test]
    fn test_preserves_api_order() {
        let body = r#"{"SearchResult":{"Items":[{"ASIN":"B3"},{"ASIN":"B1"},{"ASIN":"B2"}]}}"#;
        let asins: Vec<String> = parse(body).into_iter().map(|c| c.asin).collect();
        assert_eq!(asins, vec!["B3", "B1", "B2"]);
    }

    #[test]
    fn test_no_search_result() {
        assert!(parse("{}").is_empty());
    }

    #[test]
    fn test_decode_malformed() {
        let parser = Parser::new(Region::Us);
        let err = parser.decode("<html>not json</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(99.99), Some(Decimal::new(9999, 2)));
        assert_eq!(to_decimal(0.1), Some(Decimal::new(1, 1)));
        assert_eq!(to_decimal(120.0), Some(Decimal::new(120, 0)));
        assert_eq!(to_decimal(f64::NAN), None);
    }
}
