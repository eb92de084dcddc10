use crate::config::DEFAULT_MAX_ATTEMPTS;
use crate::error::AppError;
use crate::models::ExtractedDetail;
use crate::traits::{DetailExtractor, Fetcher, PageParser};

/// Detail Extractor that fetches a listing page with a bounded number of
/// attempts and hands the first successful body to a [`PageParser`].
///
/// There is no delay between attempts; each attempt is bounded by the
/// fetcher's own timeout.
#[derive(Clone)]
pub struct RetryingDetailExtractor<F, P>
where
    F: Fetcher,
    P: PageParser,
{
    fetcher: F,
    parser: P,
    max_attempts: u32,
}

impl<F, P> RetryingDetailExtractor<F, P>
where
    F: Fetcher,
    P: PageParser,
{
    pub fn new(fetcher: F, parser: P) -> Self {
        Self {
            fetcher,
            parser,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the retry ceiling. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetch and parse, surfacing the reason a listing was unreachable.
    pub async fn try_extract(&self, url: &str) -> Result<ExtractedDetail, AppError> {
        let html = self.fetch_with_retry(url).await?;
        self.parser
            .parse(&html)
            .map_err(|e| AppError::DetailUnreachable(format!("{url}: parse failed: {e}")))
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String, AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetcher.fetch(url).await {
                Ok(body) => {
                    tracing::debug!(%url, attempt, bytes = body.len(), "Fetched listing page");
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::debug!(%url, attempt, error = %e, "Listing fetch failed, retrying");
                }
                Err(e) => {
                    return Err(AppError::DetailUnreachable(format!(
                        "{url}: {e} (after {attempt} attempt(s))"
                    )));
                }
            }
        }
    }
}

impl<F, P> DetailExtractor for RetryingDetailExtractor<F, P>
where
    F: Fetcher,
    P: PageParser,
{
    async fn extract(&self, url: &str) -> Option<ExtractedDetail> {
        match self.try_extract(url).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping listing");
                None
            }
        }
    }
}
