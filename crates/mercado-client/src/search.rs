use mercado_core::config::IngestConfig;
use mercado_core::error::AppError;
use mercado_core::models::CandidateReference;
use mercado_core::traits::SearchClient;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::fetcher::classify_send_error;

/// Client for the marketplace's public search API.
///
/// `GET <search_url>?q=<term>` → `{"results": [{"title", "permalink"}, ...]}`.
#[derive(Clone)]
pub struct MarketplaceSearchClient {
    client: Client,
    search_url: Url,
    timeout_secs: u64,
}

impl MarketplaceSearchClient {
    pub fn new() -> Result<Self, AppError> {
        Self::from_config(&IngestConfig::default())
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self, AppError> {
        let search_url = Url::parse(&config.search_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid search URL '{}': {e}", config.search_url))
        })?;
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            search_url,
            timeout_secs: config.fetch_timeout.as_secs(),
        })
    }

    fn url_for(&self, term: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", term);
        url
    }
}

// ---- Search API types ----

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
    permalink: String,
}

/// Decode a search payload into candidate references, in result order.
pub fn parse_search_response(body: &str) -> Result<Vec<CandidateReference>, AppError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::SearchUnavailable(format!("Malformed search payload: {e}")))?;

    Ok(response
        .results
        .into_iter()
        .map(|hit| CandidateReference::new(hit.title, hit.permalink))
        .collect())
}

impl SearchClient for MarketplaceSearchClient {
    async fn search(&self, term: &str) -> Result<Vec<CandidateReference>, AppError> {
        let url = self.url_for(term);
        tracing::debug!(%url, "Querying search API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                AppError::SearchUnavailable(classify_send_error(e, self.timeout_secs).to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SearchUnavailable(format!(
                "Search API returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SearchUnavailable(format!("Failed to read search body: {e}")))?;

        parse_search_response(&body)
    }
}
