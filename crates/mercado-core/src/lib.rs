pub mod config;
pub mod detail;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod store;
pub mod traits;

pub use config::IngestConfig;
pub use detail::RetryingDetailExtractor;
pub use error::AppError;
pub use export::{ExportTable, export_spreadsheet};
pub use ingest::IngestService;
pub use models::{
    CandidateReference, ExtractedDetail, IngestReport, NOT_AVAILABLE, ProductRecord,
    UpsertOutcome,
};
pub use store::{MemoryStore, NullStore};
pub use traits::{DetailExtractor, Fetcher, PageParser, ProductStore, SearchClient};
