use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mercado_core::models::{IngestReport, ProductRecord};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    /// Search term; required and must not be blank.
    pub producto: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    #[schema(value_type = Vec<Object>)]
    pub datos: Vec<ProductRecord>,
    pub num_products: usize,
    /// Wall-clock seconds spent on the run.
    pub processing_time: f64,
}

impl From<IngestReport> for SearchResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            processing_time: report.elapsed.as_secs_f64(),
            num_products: report.count,
            datos: report.records,
        }
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExportRequest {
    pub data: ExportData,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExportData {
    /// Records to export; any flat JSON objects are accepted.
    #[schema(value_type = Vec<Object>)]
    pub datos: Vec<Map<String, Value>>,
}

// ---------------------------------------------------------------------------
// Health / errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
