//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::error::{Error, Result};
use crate::paapi::regions::Region;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "headphone-deals.toml";

/// PA-API caps both `ItemCount` and `ItemPage` at 10.
pub const PAAPI_PAGE_LIMIT: u32 = 10;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Amazon marketplace
    #[serde(default)]
    pub region: Region,

    /// Overrides the marketplace's API host
    #[serde(default)]
    pub host: Option<String>,

    /// Overrides the marketplace's SigV4 region
    #[serde(default)]
    pub signing_region: Option<String>,

    /// Overrides the `Marketplace` payload field
    #[serde(default)]
    pub marketplace: Option<String>,

    /// Search keywords
    #[serde(default = "default_keywords")]
    pub keywords: String,

    /// PA-API search index (category)
    #[serde(default = "default_search_index")]
    pub search_index: String,

    /// PA-API availability filter
    #[serde(default = "default_availability")]
    pub availability: String,

    /// Price ceiling in the marketplace currency; listings must be strictly below it
    #[serde(default = "default_max_price")]
    pub max_price: f64,

    /// Results per request (1-10)
    #[serde(default = "default_item_count")]
    pub item_count: u32,

    /// Result pages to request (1-10)
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between page requests in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Titles containing any of these are left off the page
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Rendered page path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Optional JSON snapshot of the listings
    #[serde(default)]
    pub json_output: Option<PathBuf>,

    /// Page `<title>` and heading
    #[serde(default = "default_page_title")]
    pub page_title: String,

    /// Page description and meta description
    #[serde(default = "default_page_description")]
    pub page_description: String,
}

fn default_keywords() -> String {
    "DJ headphones".to_string()
}

fn default_search_index() -> String {
    "Electronics".to_string()
}

fn default_availability() -> String {
    "Available".to_string()
}

fn default_max_price() -> f64 {
    100.0
}

fn default_item_count() -> u32 {
    10
}

fn default_max_pages() -> u32 {
    1
}

fn default_page_delay_ms() -> u64 {
    1100
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_output() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_page_title() -> String {
    "All DJ headphones under $100, lowest price first".to_string()
}

fn default_page_description() -> String {
    "Self-updating list of DJ headphones priced under $100 on Amazon US, ordered from cheapest to most expensive.".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Us,
            host: None,
            signing_region: None,
            marketplace: None,
            keywords: default_keywords(),
            search_index: default_search_index(),
            availability: default_availability(),
            max_price: default_max_price(),
            item_count: default_item_count(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
            timeout_secs: default_timeout_secs(),
            proxy: None,
            exclude_keywords: Vec::new(),
            output: default_output(),
            json_output: None,
            page_title: default_page_title(),
            page_description: default_page_description(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            debug!("Found {} in current directory", LOCAL_CONFIG_FILE);
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("headphone-deals").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Secrets are not read here.
    pub fn with_env(self) -> Self {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup`; blank values are ignored.
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(marketplace) = read("PAAPI_MARKETPLACE") {
            self.marketplace = Some(marketplace);
        }

        if let Some(host) = read("PAAPI_HOST") {
            self.host = Some(host);
        }

        if let Some(region) = read("PAAPI_REGION") {
            self.signing_region = Some(region);
        }

        if let Some(index) = read("PAAPI_SEARCH_INDEX") {
            self.search_index = index;
        }

        if let Some(availability) = read("PAAPI_AVAILABILITY") {
            self.availability = availability;
        }

        self
    }

    /// Rejects values PA-API or the filter cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.ceiling()?;

        if !(1..=PAAPI_PAGE_LIMIT).contains(&self.item_count) {
            return Err(Error::config(format!(
                "item_count must be between 1 and {}, got {}",
                PAAPI_PAGE_LIMIT, self.item_count
            )));
        }

        if !(1..=PAAPI_PAGE_LIMIT).contains(&self.max_pages) {
            return Err(Error::config(format!(
                "max_pages must be between 1 and {}, got {}",
                PAAPI_PAGE_LIMIT, self.max_pages
            )));
        }

        if self.keywords.trim().is_empty() {
            return Err(Error::config("keywords must not be empty"));
        }

        Ok(())
    }

    /// The price ceiling as an exact decimal.
    pub fn ceiling(&self) -> Result<Decimal> {
        if !self.max_price.is_finite() || self.max_price <= 0.0 {
            return Err(Error::config(format!(
                "max_price must be a positive number, got {}",
                self.max_price
            )));
        }

        Decimal::from_str(&self.max_price.to_string())
            .map_err(|e| Error::config(format!("max_price {} is out of range: {}", self.max_price, e)))
    }

    /// `MaxPrice` request field: the ceiling in the currency's lowest denomination.
    pub fn max_price_minor_units(&self) -> u64 {
        let scale = 10f64.powi(self.region.minor_unit_exponent() as i32);
        (self.max_price * scale).round() as u64
    }

    pub fn api_host(&self) -> String {
        self.host.clone().unwrap_or_else(|| self.region.api_host())
    }

    pub fn signing_region(&self) -> String {
        self.signing_region.clone().unwrap_or_else(|| self.region.signing_region().to_string())
    }

    pub fn marketplace(&self) -> String {
        self.marketplace.clone().unwrap_or_else(|| self.region.marketplace())
    }
}
