#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;
use studio_lightroom::{AdobeConfig, ImsClient, LightroomClient, TokenStore};
use studio_storage::{MemoryStore, StorageConfig};

pub const ORIGINALS_BUCKET: &str = "studio-originals";
pub const VARIANTS_BUCKET: &str = "studio-variants";
pub const PUBLIC_BASE_URL: &str = "https://cdn.example.com";
pub const CONNECT_SECRET: &str = "let-me-in";

/// Build a test `ServerConfig` with safe defaults.
///
/// Adobe endpoints point at a closed local port so nothing leaves the
/// machine.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        // Debug-build AVIF encoding is slow; keep uploads clear of the timeout.
        request_timeout_secs: 600,
        max_upload_bytes: 10 * 1024 * 1024,
        watermark_png_base64: None,
        storage: StorageConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
            originals_bucket: ORIGINALS_BUCKET.to_string(),
            variants_bucket: VARIANTS_BUCKET.to_string(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
        },
        adobe: AdobeConfig {
            client_id: "adobe-client".to_string(),
            client_secret: "adobe-secret".to_string(),
            redirect_uri: "http://localhost:3000/api/auth/adobe/callback".to_string(),
            scopes: "openid,lr_partner_apis,offline_access".to_string(),
            connect_secret: CONNECT_SECRET.to_string(),
            ims_base_url: "http://127.0.0.1:9/ims".to_string(),
            lightroom_base_url: "http://127.0.0.1:9/v2".to_string(),
        },
    }
}

/// Build the full application router backed by an in-memory object store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool).0
}

/// Like [`build_test_app`], also returning the object store so tests can
/// inspect what was written.
pub fn build_test_app_with_store(pool: PgPool) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (build_test_app_on_store(pool, store.clone()), store)
}

/// Build the router on an existing store, so objects written by one request
/// are visible to the next.
pub fn build_test_app_on_store(pool: PgPool, store: Arc<MemoryStore>) -> Router {
    build_test_app_with_config(pool, store, test_config())
}

pub fn build_test_app_with_config(
    pool: PgPool,
    store: Arc<MemoryStore>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        tokens: Arc::new(TokenStore::new(
            pool.clone(),
            ImsClient::new(config.adobe.clone()),
        )),
        lightroom: Arc::new(LightroomClient::new(&config.adobe)),
        pool,
        store,
        watermark: None,
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body).await
}

pub const BOUNDARY: &str = "studio-test-boundary";

/// One part of a multipart form: `(name, file_name, bytes)`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A small PNG with a horizontal gradient.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
