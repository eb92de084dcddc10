use mercado_client::{ListingPageParser, MarketplaceSearchClient, ReqwestFetcher};
use mercado_core::{AppError, IngestConfig, RetryingDetailExtractor};
use mercado_db::Database;

pub type ListingExtractor = RetryingDetailExtractor<ReqwestFetcher, ListingPageParser>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
///
/// The HTTP clients are built once at startup; handlers clone them, which
/// shares the underlying connection pools.
pub struct AppState {
    pub db: Database,
    pub search: MarketplaceSearchClient,
    pub extractor: ListingExtractor,
}

impl AppState {
    pub fn new(db: Database, ingest: &IngestConfig) -> Result<Self, AppError> {
        let fetcher = ReqwestFetcher::from_config(ingest)?;
        let extractor = RetryingDetailExtractor::new(fetcher, ListingPageParser::new())
            .with_max_attempts(ingest.max_attempts);
        let search = MarketplaceSearchClient::from_config(ingest)?;

        Ok(Self {
            db,
            search,
            extractor,
        })
    }
}
