use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{ProductRecord, UpsertOutcome};
use crate::traits::ProductStore;

/// A no-op ProductStore for use when persistence is not needed.
#[derive(Debug, Clone)]
pub struct NullStore;

impl ProductStore for NullStore {
    async fn upsert(&self, _records: &[ProductRecord]) -> Result<UpsertOutcome, AppError> {
        Ok(UpsertOutcome::default())
    }
}

/// Process-local ProductStore keyed by canonical URL.
///
/// Clones share the same backing collection. Entities keep their first
/// insertion position; re-upserting a key replaces the fields in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<ProductRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored records in first-insertion order.
    pub fn records(&self) -> Result<Vec<ProductRecord>, AppError> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, canonical_url: &str) -> Result<Option<ProductRecord>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .find(|r| r.canonical_url == canonical_url)
            .cloned())
    }

    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<ProductRecord>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::PersistenceUnavailable("memory store lock poisoned".into()))
    }
}

impl ProductStore for MemoryStore {
    async fn upsert(&self, records: &[ProductRecord]) -> Result<UpsertOutcome, AppError> {
        let mut outcome = UpsertOutcome::default();
        if records.is_empty() {
            return Ok(outcome);
        }

        // One guard for the whole batch keeps it atomic with respect to other clones.
        let mut stored = self.lock()?;
        for record in records {
            match stored
                .iter_mut()
                .find(|r| r.canonical_url == record.canonical_url)
            {
                Some(existing) => {
                    *existing = record.clone();
                    outcome.modified += 1;
                }
                None => {
                    stored.push(record.clone());
                    outcome.inserted += 1;
                }
            }
        }

        Ok(outcome)
    }
}
