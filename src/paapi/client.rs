//! Signed SearchItems client for the Product Advertising API 5.0.

use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::{truncate, ApiError, Error, Result};
use crate::paapi::models::{SearchItemsRequest, SearchItemsResponse, SEARCH_RESOURCES};
use crate::paapi::parser::Parser;
use crate::paapi::regions::Region;
use crate::paapi::signing::{self, SignableRequest, SigningParams, PAAPI_SERVICE};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

pub const SEARCH_ITEMS_PATH: &str = "/paapi5/searchitems";
pub const SEARCH_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.SearchItems";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const CONTENT_ENCODING: &str = "amz-1.0";

/// Longest response excerpt carried in an error message.
const ERROR_BODY_CHARS: usize = 500;

/// The fixed part of a search: everything except the page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: String,
    pub search_index: String,
    pub availability: String,
    /// Ceiling in the currency's lowest denomination.
    pub max_price: u64,
    pub item_count: u32,
}

impl SearchQuery {
    pub fn from_config(config: &Config) -> Self {
        Self {
            keywords: config.keywords.clone(),
            search_index: config.search_index.clone(),
            availability: config.availability.clone(),
            max_price: config.max_price_minor_units(),
            item_count: config.item_count,
        }
    }
}

/// Trait for SearchItems calls - enables mocking for tests.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Runs one SearchItems request for `page` (1-based).
    async fn search_items(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> std::result::Result<SearchItemsResponse, ApiError>;

    /// Returns the configured marketplace.
    fn region(&self) -> Region;
}

/// PA-API client that signs every request with SigV4.
pub struct PaapiClient {
    client: Client,
    credentials: Credentials,
    region: Region,
    host: String,
    signing_region: String,
    marketplace: String,
    base_url: Option<String>,
}

impl PaapiClient {
    /// Creates a new client for the configured marketplace.
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        Self::with_base_url(config, credentials, None)
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub fn with_base_url(
        config: &Config,
        credentials: Credentials,
        base_url: Option<String>,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            region: config.region,
            host: config.api_host(),
            signing_region: config.signing_region(),
            marketplace: config.marketplace(),
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or the API host for production).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| format!("https://{}", self.host))
    }

    fn payload(&self, query: &SearchQuery, page: u32) -> SearchItemsRequest {
        SearchItemsRequest {
            keywords: query.keywords.clone(),
            marketplace: self.marketplace.clone(),
            partner_tag: self.credentials.partner_tag().to_string(),
            partner_type: "Associates".to_string(),
            resources: SEARCH_RESOURCES.iter().map(|r| r.to_string()).collect(),
            search_index: query.search_index.clone(),
            max_price: query.max_price,
            item_page: page,
            item_count: query.item_count,
            availability: query.availability.clone(),
        }
    }

    /// Signed headers plus `Authorization` for `body`, stamped now.
    fn signed_headers(&self, body: &[u8]) -> Vec<(String, String)> {
        let now = Utc::now();
        let request = SignableRequest::new("POST", SEARCH_ITEMS_PATH, body)
            .header("content-encoding", CONTENT_ENCODING)
            .header("content-type", CONTENT_TYPE)
            .header("host", &self.host)
            .header("x-amz-date", signing::amz_date(now))
            .header("x-amz-target", SEARCH_ITEMS_TARGET);

        let params = SigningParams {
            access_key: self.credentials.access_key(),
            secret_key: self.credentials.secret_key(),
            region: &self.signing_region,
            service: PAAPI_SERVICE,
        };
        let authorization = signing::authorization(&params, &request, now);

        // Host comes from the URL; everything else is sent as signed.
        let mut headers: Vec<(String, String)> = request
            .headers()
            .filter(|(name, _)| *name != "host")
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        headers.push(("authorization".to_string(), authorization));
        headers
    }

    async fn post(&self, body: Vec<u8>) -> std::result::Result<String, ApiError> {
        let url = format!("{}{}", self.base_url(), SEARCH_ITEMS_PATH);
        debug!("POST {}", url);

        let mut request = self.client.post(url.as_str());
        for (name, value) in self.signed_headers(&body) {
            request = request.header(name, value);
        }

        let response =
            request.body(body).send().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {}", status);

        let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        if status == 429 {
            warn!("Throttled by PA-API (429). The request quota is about one call per second.");
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&text, ERROR_BODY_CHARS),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl ProductSearch for PaapiClient {
    async fn search_items(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> std::result::Result<SearchItemsResponse, ApiError> {
        let payload = self.payload(query, page);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| ApiError::Transport(format!("failed to encode request: {}", e)))?;

        info!("Searching: {} (page {})", query.keywords, page);
        let text = self.post(body).await?;

        let response = Parser::new(self.region).decode(&text)?;
        if !response.errors.is_empty() {
            let detail = response
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::Service(truncate(&detail, ERROR_BODY_CHARS)));
        }

        Ok(response)
    }

    fn region(&self) -> Region {
        self.region
    }
}
