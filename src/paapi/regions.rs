//! Amazon marketplaces and their Product Advertising API endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplaces served by PA-API 5.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    De,
    Fr,
    Es,
    It,
    Ca,
    Au,
    Jp,
    In,
    Br,
    Mx,
    Nl,
    Se,
    Pl,
}

impl Region {
    /// Returns the Amazon domain for this region.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::Us => "amazon.com",
            Region::Uk => "amazon.co.uk",
            Region::De => "amazon.de",
            Region::Fr => "amazon.fr",
            Region::Es => "amazon.es",
            Region::It => "amazon.it",
            Region::Ca => "amazon.ca",
            Region::Au => "amazon.com.au",
            Region::Jp => "amazon.co.jp",
            Region::In => "amazon.in",
            Region::Br => "amazon.com.br",
            Region::Mx => "amazon.com.mx",
            Region::Nl => "amazon.nl",
            Region::Se => "amazon.se",
            Region::Pl => "amazon.pl",
        }
    }

    /// Returns the storefront URL for this region.
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Value of the `Marketplace` field in request payloads.
    pub fn marketplace(&self) -> String {
        format!("www.{}", self.domain())
    }

    /// PA-API host serving this marketplace.
    pub fn api_host(&self) -> String {
        format!("webservices.{}", self.domain())
    }

    /// AWS region used in the SigV4 credential scope.
    pub fn signing_region(&self) -> &'static str {
        match self {
            Region::Us | Region::Ca | Region::Br | Region::Mx => "us-east-1",
            Region::Au | Region::Jp => "us-west-2",
            Region::Uk
            | Region::De
            | Region::Fr
            | Region::Es
            | Region::It
            | Region::In
            | Region::Nl
            | Region::Se
            | Region::Pl => "eu-west-1",
        }
    }

    /// Returns the currency code for this region.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::De | Region::Fr | Region::Es | Region::It | Region::Nl => "EUR",
            Region::Ca => "CAD",
            Region::Au => "AUD",
            Region::Jp => "JPY",
            Region::In => "INR",
            Region::Br => "BRL",
            Region::Mx => "MXN",
            Region::Se => "SEK",
            Region::Pl => "PLN",
        }
    }

    /// Decimal places of the currency's lowest denomination; `MaxPrice` is sent in it.
    pub fn minor_unit_exponent(&self) -> u32 {
        match self {
            Region::Jp => 0,
            _ => 2,
        }
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Us,
            Region::Uk,
            Region::De,
            Region::Fr,
            Region::Es,
            Region::It,
            Region::Ca,
            Region::Au,
            Region::Jp,
            Region::In,
            Region::Br,
            Region::Mx,
            Region::Nl,
            Region::Se,
            Region::Pl,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::De => "de",
            Region::Fr => "fr",
            Region::Es => "es",
            Region::It => "it",
            Region::Ca => "ca",
            Region::Au => "au",
            Region::Jp => "jp",
            Region::In => "in",
            Region::Br => "br",
            Region::Mx => "mx",
            Region::Nl => "nl",
            Region::Se => "se",
            Region::Pl => "pl",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Region::Us),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "es" | "spain" => Ok(Region::Es),
            "it" | "italy" => Ok(Region::It),
            "ca" | "canada" => Ok(Region::Ca),
            "au" | "australia" => Ok(Region::Au),
            "jp" | "japan" => Ok(Region::Jp),
            "in" | "india" => Ok(Region::In),
            "br" | "brazil" => Ok(Region::Br),
            "mx" | "mexico" => Ok(Region::Mx),
            "nl" | "netherlands" => Ok(Region::Nl),
            "se" | "sweden" => Ok(Region::Se),
            "pl" | "poland" => Ok(Region::Pl),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<String> = Region::all().iter().map(Region::to_string).collect();
        write!(f, "Unknown region '{}'. Valid regions: {}", self.0, valid.join(", "))
    }
}

impl std::error::Error for RegionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_unit_exponent() {
        assert_eq!(Region::Jp.minor_unit_exponent(), 0);
        for region in Region::all().iter().filter(|r| **r != Region::Jp) {
            assert_eq!(region.minor_unit_exponent(), 2, "{}", region);
        }
    }

    #[test]
    fn test_parse_error_lists_regions() {
        let err = Region::from_str("atlantis").unwrap_err().to_string();
        assert_eq!(
            err,
            "Unknown region 'atlantis'. Valid regions: us, uk, de, fr, es, it, ca, au, jp, in, br, mx, nl, se, pl"
        );
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!(Region::from_str("us").unwrap(), Region::Us);
        assert_eq!(Region::from_str("usa").unwrap(), Region::Us);
        assert_eq!(Region::from_str("gb").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("germany").unwrap(), Region::De);
        assert_eq!(Region::from_str("japan").unwrap(), Region::Jp);

        // Case insensitive
        assert_eq!(Region::from_str("US").unwrap(), Region::Us);
        assert_eq!(Region::from_str("Poland").unwrap(), Region::Pl);

        assert!(Region::from_str("invalid").is_err());
        assert!(Region::from_str("").is_err());
    }

    #[test]
    fn test_us_endpoint() {
        assert_eq!(Region::Us.api_host(), "webservices.amazon.com");
        assert_eq!(Region::Us.marketplace(), "www.amazon.com");
        assert_eq!(Region::Us.signing_region(), "us-east-1");
        assert_eq!(Region::Us.currency(), "USD");
        assert_eq!(Region::Us.base_url(), "https://www.amazon.com");
    }

    #[test]
    fn test_signing_regions() {
        assert_eq!(Region::Uk.signing_region(), "eu-west-1");
        assert_eq!(Region::De.signing_region(), "eu-west-1");
        assert_eq!(Region::In.signing_region(), "eu-west-1");
        assert_eq!(Region::Ca.signing_region(), "us-east-1");
        assert_eq!(Region::Mx.signing_region(), "us-east-1");
        assert_eq!(Region::Au.signing_region(), "us-west-2");
        assert_eq!(Region::Jp.signing_region(), "us-west-2");
    }

    #[test]
    fn test_api_hosts_follow_domain() {
        for region in Region::all() {
            assert_eq!(region.api_host(), format!("webservices.{}", region.domain()));
            assert_eq!(region.marketplace(), format!("www.{}", region.domain()));
        }
        assert_eq!(Region::Jp.api_host(), "webservices.amazon.co.jp");
    }

    #[test]
    fn test_region_all() {
        let all = Region::all();
        assert_eq!(all.len(), 15);
        assert!(all.contains(&Region::Us));
        assert!(all.contains(&Region::Pl));
    }

    #[test]
    fn test_display_parses_back() {
        for region in Region::all() {
            assert_eq!(Region::from_str(&region.to_string()).unwrap(), *region);
        }
    }

    #[test]
    fn test_region_parse_error_display() {
        let err = Region::from_str("xyz").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid regions"));
    }

    #[test]
    fn test_region_serde() {
        let json = serde_json::to_string(&Region::Us).unwrap();
        assert_eq!(json, "\"us\"");

        let parsed: Region = serde_json::from_str("\"uk\"").unwrap();
        assert_eq!(parsed, Region::Uk);
    }
}
