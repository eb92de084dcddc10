use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mercado_core::export::{EXPORT_FILENAME, XLSX_MIME};
use mercado_core::{AppError, IngestService, export_spreadsheet};

use crate::dto::{ExportRequest, HealthResponse, SearchRequest, SearchResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/v1/search", post(search))
        .route("/v1/export", post(export));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Extracted products", body = SearchResponse),
        (status = 400, description = "Missing or blank producto", body = crate::dto::ErrorResponse),
        (status = 502, description = "Search API unavailable", body = crate::dto::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Result<axum::Json<SearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = body?;
    let term = body
        .producto
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("producto is required".into()))?;

    let service = IngestService::new(
        state.search.clone(),
        state.extractor.clone(),
        state.db.product_repo(),
    );
    let report = service.ingest(term).await?;

    Ok(axum::Json(SearchResponse::from(report)))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Spreadsheet attachment", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Malformed body", body = crate::dto::ErrorResponse),
        (status = 500, description = "Spreadsheet generation failed", body = crate::dto::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn export(
    body: Result<axum::Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = body?;
    let records = body.data.datos;

    let bytes = tokio::task::spawn_blocking(move || export_spreadsheet(&records))
        .await
        .map_err(|e| AppError::ExportFailure(format!("Export task failed: {e}")))??;

    tracing::info!(bytes = bytes.len(), "Spreadsheet generated");

    let disposition = format!("attachment; filename=\"{EXPORT_FILENAME}\"");
    Ok((
        [(CONTENT_TYPE, XLSX_MIME.to_string()), (CONTENT_DISPOSITION, disposition)],
        bytes,
    ))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let healthy = state.db.product_repo().health_check().await.is_ok();

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        database: if healthy { "ok" } else { "error" },
    };

    (status, axum::Json(response))
}
