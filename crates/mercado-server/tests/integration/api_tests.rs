use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration::common::{setup_offline_app, setup_test_app};

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let (router, _container) = setup_test_app().await;

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn search_without_producto_returns_400() {
    let response = setup_offline_app()
        .oneshot(post_json("/v1/search", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_input");
    assert!(json["message"].as_str().unwrap().contains("producto"));
}

#[tokio::test]
async fn search_with_blank_producto_returns_400() {
    let response = setup_offline_app()
        .oneshot(post_json("/v1/search", r#"{"producto": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_with_malformed_json_returns_400() {
    let response = setup_offline_app()
        .oneshot(post_json("/v1/search", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_input");
}

#[tokio::test]
async fn search_with_unreachable_api_returns_502() {
    let response = setup_offline_app()
        .oneshot(post_json("/v1/search", r#"{"producto": "laptop"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "search_unavailable");
}

#[tokio::test]
async fn one_router_serves_repeated_searches() {
    let app = setup_offline_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/v1/search", r#"{"producto": "laptop"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

#[tokio::test]
async fn export_returns_xlsx_attachment() {
    let body = r#"{"data": {"datos": [
        {"title": "Laptop", "canonical_url": "https://articulo.example/MLM-1", "units_sold": "150"},
        {"title": "Mouse", "canonical_url": "https://articulo.example/MLM-2", "seller": "N/A"}
    ]}}"#;

    let response = setup_offline_app()
        .oneshot(post_json("/v1/export", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"productos_mercadolibre.xlsx\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn export_of_empty_list_still_returns_workbook() {
    let response = setup_offline_app()
        .oneshot(post_json("/v1/export", r#"{"data": {"datos": []}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn export_without_data_returns_400() {
    let response = setup_offline_app()
        .oneshot(post_json("/v1/export", r#"{"datos": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let response = setup_offline_app()
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/v1/search"].is_object());
    assert!(json["paths"]["/v1/export"].is_object());
}
