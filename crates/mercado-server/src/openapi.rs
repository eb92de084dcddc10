use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mercado API",
        version = "0.1.0",
        description = "MercadoLibre listing search, extraction and spreadsheet export."
    ),
    paths(
        crate::routes::search,
        crate::routes::export,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::SearchRequest,
        crate::dto::SearchResponse,
        crate::dto::ExportRequest,
        crate::dto::ExportData,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "products", description = "Listing ingestion and export"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
