//! Page build: credentials → search → filter & sort → render → write.

use crate::config::Config;
use crate::credentials::{self, Credentials};
use crate::error::{Error, Result};
use crate::filters::{dedup_by_asin, FilterChain, FilterChainBuilder, ListingSet};
use crate::output::{write_json_snapshot, PageWriter};
use crate::paapi::{Candidate, PaapiClient, Parser, ProductSearch, SearchQuery};
use crate::render::PageRenderer;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Distinct candidates returned by the API
    pub candidates: usize,
    /// Listings on the page
    pub listings: usize,
    /// Page that was written
    pub output: PathBuf,
}

/// Runs one page build.
pub struct BuildCommand {
    config: Config,
}

impl BuildCommand {
    /// Creates a new build command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the page from live API results, reading credentials from the environment.
    pub async fn execute(&self) -> Result<BuildReport> {
        self.execute_with(Credentials::from_env, PaapiClient::new).await
    }

    /// Builds the page with injectable credential loading and client construction.
    ///
    /// Configuration and credentials are checked before `connect` is called, so a
    /// misconfigured run never touches the network.
    pub async fn execute_with<C, F>(
        &self,
        load_credentials: impl FnOnce() -> Result<Credentials>,
        connect: F,
    ) -> Result<BuildReport>
    where
        C: ProductSearch,
        F: FnOnce(&Config, Credentials) -> Result<C>,
    {
        self.config.validate()?;
        let credentials = load_credentials()?;
        let partner_tag = credentials.partner_tag().to_string();

        let client = connect(&self.config, credentials)?;
        self.execute_with_client(&client, &partner_tag).await
    }

    /// Builds the page with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ProductSearch,
        partner_tag: &str,
    ) -> Result<BuildReport> {
        self.config.validate()?;
        let candidates = self.fetch(client).await?;
        self.publish(candidates, partner_tag)
    }

    /// Builds the page from a saved SearchItems response body, without credentials.
    pub fn execute_offline(&self, response_path: &Path) -> Result<BuildReport> {
        self.config.validate()?;
        info!("Rendering from saved response: {}", response_path.display());

        let body = std::fs::read_to_string(response_path).map_err(|e| {
            Error::config(format!(
                "Failed to read saved response {}: {}",
                response_path.display(),
                e
            ))
        })?;

        let parser = Parser::new(self.config.region);
        let response = parser.decode(&body)?;
        let candidates = dedup_by_asin(parser.candidates(&response));

        let partner_tag = credentials::partner_tag_from_env().unwrap_or_default();
        self.publish(candidates, &partner_tag)
    }

    async fn fetch(&self, client: &impl ProductSearch) -> Result<Vec<Candidate>> {
        let query = SearchQuery::from_config(&self.config);
        let parser = Parser::new(client.region());
        let mut all: Vec<Candidate> = Vec::new();

        for page in 1..=self.config.max_pages {
            if page > 1 && self.config.page_delay_ms > 0 {
                debug!("Delaying {}ms", self.config.page_delay_ms);
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }

            let response = client.search_items(&query, page).await?;
            let candidates = parser.candidates(&response);

            if candidates.is_empty() {
                debug!("No results on page {}, stopping", page);
                break;
            }

            debug!("Page {} returned {} candidates", page, candidates.len());
            all.extend(candidates);

            let total = response.search_result.as_ref().and_then(|r| r.total_result_count);
            if let Some(total) = total {
                if page.saturating_mul(query.item_count) >= total {
                    debug!("All {} results fetched", total);
                    break;
                }
            }
        }

        Ok(dedup_by_asin(all))
    }

    fn filters(&self) -> Result<FilterChain> {
        let chain = FilterChainBuilder::new(self.config.ceiling()?)
            .exclude_keywords(self.config.exclude_keywords.clone())
            .build();

        debug!("Active filters: {}", chain.descriptions().join(", "));
        Ok(chain)
    }

    /// Filter, sort, render and write. Nothing is written unless rendering succeeded.
    fn publish(&self, candidates: Vec<Candidate>, partner_tag: &str) -> Result<BuildReport> {
        let candidate_count = candidates.len();
        let chain = self.filters()?;
        let listings = ListingSet::select(candidates, &chain);

        info!("{} of {} candidates under {}", listings.len(), candidate_count, chain.ceiling());

        let renderer = PageRenderer::new(
            self.config.page_title.clone(),
            self.config.page_description.clone(),
            partner_tag,
        );
        let page = renderer.render(&listings);

        let writer = PageWriter::new(self.config.output.clone());
        writer.write(&page)?;
        info!("Wrote {}", writer.path().display());

        if let Some(json_path) = &self.config.json_output {
            write_json_snapshot(json_path, &listings)?;
            info!("Wrote {}", json_path.display());
        }

        Ok(BuildReport {
            candidates: candidate_count,
            listings: listings.len(),
            output: self.config.output.clone(),
        })
    }
}
