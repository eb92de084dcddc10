use chrono::{DateTime, Utc};
use mercado_core::error::AppError;
use mercado_core::models::{ProductRecord, UpsertOutcome};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

/// A persisted product: the record plus storage bookkeeping.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredProduct {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: ProductRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for product persistence in PostgreSQL, keyed by canonical URL.
#[derive(Clone)]
pub struct ProductRepository {
    pool: Pool<Postgres>,
}

fn db_error(e: sqlx::Error) -> AppError {
    AppError::PersistenceUnavailable(e.to_string())
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace every record by `canonical_url` inside one transaction.
    ///
    /// A key already present, including one written earlier in the same
    /// batch, counts as modified even when the field values are identical.
    pub async fn upsert(&self, records: &[ProductRecord]) -> Result<UpsertOutcome, AppError> {
        let mut outcome = UpsertOutcome::default();
        if records.is_empty() {
            return Ok(outcome);
        }

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for record in records {
            // xmax is 0 only for a freshly inserted tuple.
            let (inserted,): (bool,) = sqlx::query_as(
                r#"
                INSERT INTO products (
                    canonical_url, title, seller, original_price, discounted_price,
                    discount_label, installment_plan, interest_free_months,
                    shipping_info, units_sold, image_url, extracted_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (canonical_url) DO UPDATE SET
                    title = EXCLUDED.title,
                    seller = EXCLUDED.seller,
                    original_price = EXCLUDED.original_price,
                    discounted_price = EXCLUDED.discounted_price,
                    discount_label = EXCLUDED.discount_label,
                    installment_plan = EXCLUDED.installment_plan,
                    interest_free_months = EXCLUDED.interest_free_months,
                    shipping_info = EXCLUDED.shipping_info,
                    units_sold = EXCLUDED.units_sold,
                    image_url = EXCLUDED.image_url,
                    extracted_at = EXCLUDED.extracted_at,
                    updated_at = NOW()
                RETURNING (xmax = 0) AS inserted
                "#,
            )
            .bind(&record.canonical_url)
            .bind(&record.title)
            .bind(&record.seller)
            .bind(&record.original_price)
            .bind(&record.discounted_price)
            .bind(&record.discount_label)
            .bind(&record.installment_plan)
            .bind(&record.interest_free_months)
            .bind(&record.shipping_info)
            .bind(&record.units_sold)
            .bind(&record.image_url)
            .bind(record.extracted_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

            if inserted {
                outcome.inserted += 1;
            } else {
                outcome.modified += 1;
            }
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(
            inserted = outcome.inserted,
            modified = outcome.modified,
            "Upserted product batch"
        );
        Ok(outcome)
    }

    /// Get the stored product for a canonical URL.
    pub async fn get_by_url(&self, canonical_url: &str) -> Result<Option<StoredProduct>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, canonical_url, title, seller, original_price, discounted_price,
                   discount_label, installment_plan, interest_free_months, shipping_info,
                   units_sold, image_url, extracted_at, created_at, updated_at
            FROM products
            WHERE canonical_url = $1
            "#,
        )
        .bind(canonical_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    /// List stored products, most recently written first.
    pub async fn list(&self, limit: usize) -> Result<Vec<StoredProduct>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, canonical_url, title, seller, original_price, discounted_price,
                   discount_label, installment_plan, interest_free_months, shipping_info,
                   units_sold, image_url, extracted_at, created_at, updated_at
            FROM products
            ORDER BY updated_at DESC, canonical_url
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Number of stored products.
    pub async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count)
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    canonical_url: String,
    title: String,
    seller: String,
    original_price: String,
    discounted_price: String,
    discount_label: String,
    installment_plan: String,
    interest_free_months: String,
    shipping_info: String,
    units_sold: String,
    image_url: String,
    extracted_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for StoredProduct {
    fn from(row: ProductRow) -> Self {
        StoredProduct {
            id: row.id,
            record: ProductRecord {
                title: row.title,
                canonical_url: row.canonical_url,
                seller: row.seller,
                original_price: row.original_price,
                discounted_price: row.discounted_price,
                discount_label: row.discount_label,
                installment_plan: row.installment_plan,
                interest_free_months: row.interest_free_months,
                shipping_info: row.shipping_info,
                units_sold: row.units_sold,
                image_url: row.image_url,
                extracted_at: row.extracted_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// -- Trait implementation --

impl mercado_core::traits::ProductStore for ProductRepository {
    async fn upsert(&self, records: &[ProductRecord]) -> Result<UpsertOutcome, AppError> {
        ProductRepository::upsert(self, records).await
    }
}
