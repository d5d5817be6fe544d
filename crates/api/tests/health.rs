//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, send};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["adobe_configured"], true);
    assert_eq!(json["watermark_enabled"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_missing_adobe_credentials(pool: PgPool) {
    let mut config = common::test_config();
    config.adobe.client_id.clear();
    let app = common::build_test_app_with_config(
        pool,
        std::sync::Arc::new(studio_storage::MemoryStore::new()),
        config,
    );

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["adobe_configured"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cors_preflight_allows_admin_origin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/collections")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "PATCH")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn incoming_request_id_is_echoed(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "upload-batch-7")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.headers().get("x-request-id").unwrap(), "upload-batch-7");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_over_body_limit_returns_413(pool: PgPool) {
    let mut config = common::test_config();
    config.max_upload_bytes = 1024;
    let app = common::build_test_app_with_config(
        pool,
        std::sync::Arc::new(studio_storage::MemoryStore::new()),
        config,
    );

    let oversized = vec![0u8; 4096];
    let response =
        common::post_multipart(app, "/api/upload", &[("file", Some("big.png"), &oversized[..])])
            .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
