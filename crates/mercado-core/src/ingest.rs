use std::time::Instant;

use chrono::Utc;

use crate::error::AppError;
use crate::models::{IngestReport, ProductRecord};
use crate::traits::{DetailExtractor, ProductStore, SearchClient};

/// Orchestrates one ingestion run: search → per-item detail → assemble → upsert.
///
/// Generic over all external dependencies via traits, enabling dependency injection
/// and testability without real HTTP or database calls.
pub struct IngestService<S, D, P>
where
    S: SearchClient,
    D: DetailExtractor,
    P: ProductStore,
{
    search: S,
    extractor: D,
    store: P,
}

impl<S, D, P> IngestService<S, D, P>
where
    S: SearchClient,
    D: DetailExtractor,
    P: ProductStore,
{
    pub fn new(search: S, extractor: D, store: P) -> Self {
        Self {
            search,
            extractor,
            store,
        }
    }

    /// Run the pipeline for a search term.
    ///
    /// 1. Search once; a failure aborts the run with `SearchUnavailable`
    /// 2. Extract each candidate in turn, skipping unreachable listings
    /// 3. Assemble records stamped with their extraction time
    /// 4. Upsert the batch; a store failure is logged and swallowed
    ///
    /// The returned records are the in-memory batch regardless of the
    /// store outcome.
    pub async fn ingest(&self, term: &str) -> Result<IngestReport, AppError> {
        let started = Instant::now();
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::InvalidInput(
                "search term must not be empty".into(),
            ));
        }

        // 1. Search
        tracing::info!(%term, "Searching marketplace");
        let candidates = self.search.search(term).await.map_err(|e| match e {
            AppError::SearchUnavailable(_) => e,
            other => AppError::SearchUnavailable(other.to_string()),
        })?;
        tracing::info!(candidates = candidates.len(), "Search returned candidates");

        // 2 & 3. Extract + assemble, strictly one candidate at a time
        let mut records = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.extractor.extract(&candidate.canonical_url).await {
                Some(detail) => {
                    records.push(ProductRecord::assemble(candidate, detail, Utc::now()));
                }
                None => {
                    tracing::warn!(url = %candidate.canonical_url, "Candidate skipped");
                }
            }
        }

        // 4. Persist, best effort
        let mut persisted = None;
        if !records.is_empty() {
            match self.store.upsert(&records).await {
                Ok(outcome) => {
                    tracing::info!(
                        inserted = outcome.inserted,
                        modified = outcome.modified,
                        "Saved/updated {} products",
                        outcome.affected()
                    );
                    persisted = Some(outcome);
                }
                Err(e) => tracing::error!(error = %e, "Failed to persist products"),
            }
        }

        let count = records.len();
        let elapsed = started.elapsed();
        tracing::info!(%term, count, elapsed_ms = elapsed.as_millis() as u64, "Ingestion complete");

        Ok(IngestReport {
            records,
            count,
            persisted,
            elapsed,
        })
    }
}
