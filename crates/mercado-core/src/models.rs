use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored in any detail field whose locator matched nothing.
pub const NOT_AVAILABLE: &str = "N/A";

/// One search hit: a listing title and the permanent link to its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateReference {
    pub title: String,
    pub canonical_url: String,
}

impl CandidateReference {
    pub fn new(title: impl Into<String>, canonical_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            canonical_url: canonical_url.into(),
        }
    }
}

/// Commercial attributes parsed off a listing page.
///
/// Every field is either the located value or [`NOT_AVAILABLE`]; absence is
/// a valid terminal state per field, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDetail {
    pub seller: String,
    pub original_price: String,
    pub discounted_price: String,
    pub discount_label: String,
    pub installment_plan: String,
    pub interest_free_months: String,
    pub shipping_info: String,
    pub units_sold: String,
    pub image_url: String,
}

impl Default for ExtractedDetail {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            seller: na(),
            original_price: na(),
            discounted_price: na(),
            discount_label: na(),
            installment_plan: na(),
            interest_free_months: na(),
            shipping_info: na(),
            units_sold: na(),
            image_url: na(),
        }
    }
}

/// A normalized listing record. `canonical_url` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub canonical_url: String,
    pub seller: String,
    pub original_price: String,
    pub discounted_price: String,
    pub discount_label: String,
    pub installment_plan: String,
    pub interest_free_months: String,
    pub shipping_info: String,
    pub units_sold: String,
    pub image_url: String,
    pub extracted_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Merge a search hit with its parsed detail, stamped with `now`.
    pub fn assemble(
        candidate: CandidateReference,
        detail: ExtractedDetail,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: candidate.title,
            canonical_url: candidate.canonical_url,
            seller: detail.seller,
            original_price: detail.original_price,
            discounted_price: detail.discounted_price,
            discount_label: detail.discount_label,
            installment_plan: detail.installment_plan,
            interest_free_months: detail.interest_free_months,
            shipping_info: detail.shipping_info,
            units_sold: detail.units_sold,
            image_url: detail.image_url,
            extracted_at: now,
        }
    }

    /// The record as an ordered field-name → value mapping, in declaration order.
    pub fn to_row(&self) -> Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}

/// Result of a batched upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub inserted: u64,
    pub modified: u64,
}

impl UpsertOutcome {
    /// Inserted plus modified entities.
    pub fn affected(&self) -> u64 {
        self.inserted + self.modified
    }
}

/// Outcome of one ingestion run.
///
/// Skipped candidates are not reported individually: a short `records`
/// list may mean the search had few hits or that some pages failed.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub records: Vec<ProductRecord>,
    pub count: usize,
    /// Store outcome; `None` when nothing was written or the write failed.
    pub persisted: Option<UpsertOutcome>,
    pub elapsed: Duration,
}
