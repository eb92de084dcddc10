use std::future::Future;

use crate::error::AppError;
use crate::models::{CandidateReference, ExtractedDetail, ProductRecord, UpsertOutcome};

/// Fetches the raw body of a page. A non-success status is an error.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Turns a listing page body into its commercial attributes.
///
/// Missing elements become sentinel values; an `Err` is reserved for
/// documents that cannot be processed at all.
pub trait PageParser: Send + Sync + Clone {
    fn parse(&self, html: &str) -> Result<ExtractedDetail, AppError>;
}

/// Queries the marketplace search API for a term.
pub trait SearchClient: Send + Sync + Clone {
    /// Exactly one request, no retry. Any failure is `AppError::SearchUnavailable`.
    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<CandidateReference>, AppError>> + Send;
}

/// Produces the detail for one listing, or `None` when the page is unreachable.
pub trait DetailExtractor: Send + Sync + Clone {
    fn extract(&self, url: &str) -> impl Future<Output = Option<ExtractedDetail>> + Send;
}

/// Idempotent keyed storage for product records.
pub trait ProductStore: Send + Sync + Clone {
    /// Insert or replace each record by `canonical_url`, as one atomic batch.
    fn upsert(
        &self,
        records: &[ProductRecord],
    ) -> impl Future<Output = Result<UpsertOutcome, AppError>> + Send;
}
