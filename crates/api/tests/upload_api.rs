//! HTTP-level tests for the upload pipeline and photo deletion.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete, get, post_multipart, sample_png, ORIGINALS_BUCKET, PUBLIC_BASE_URL,
    VARIANTS_BUCKET,
};
use serde_json::json;
use sqlx::PgPool;
use studio_core::types::DbId;
use studio_core::variants::VARIANTS_PER_PHOTO;
use studio_db::repositories::{PhotoRepo, PhotoVariantRepo};
use studio_storage::ObjectStore;

async fn create_collection(pool: &PgPool, slug: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/collections",
        json!({"name": slug, "slug": slug}),
    )
    .await;
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_without_file_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_multipart(app, "/api/upload", &[("collection_id", None, &b"abc"[..])]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file provided");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_of_non_image_returns_400(pool: PgPool) {
    let (app, store) = common::build_test_app_with_store(pool);
    let response = post_multipart(
        app,
        "/api/upload",
        &[("file", Some("notes.txt"), &b"definitely not pixels"[..])],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_IMAGE");
    assert!(store.keys(ORIGINALS_BUCKET).is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_stores_original_and_all_variants(pool: PgPool) {
    let png = sample_png(480, 360);
    let (app, store) = common::build_test_app_with_store(pool.clone());

    let response = post_multipart(app, "/api/upload", &[("file", Some("sunset.png"), &png[..])]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let photo_id: DbId = json["photoId"].as_str().unwrap().parse().unwrap();
    assert_eq!(json["width"], 480);
    assert_eq!(json["height"], 360);
    assert_eq!(json["variantCount"], VARIANTS_PER_PHOTO);
    let thumbnail = json["thumbnailUrl"].as_str().unwrap();
    assert!(thumbnail.starts_with(&format!("{PUBLIC_BASE_URL}/variants/{photo_id}/")));
    assert!(thumbnail.ends_with("_400.webp"));

    // Objects.
    assert_eq!(
        store.keys(ORIGINALS_BUCKET),
        vec![format!("originals/{photo_id}.jpg")]
    );
    let original = store
        .get(ORIGINALS_BUCKET, &format!("originals/{photo_id}.jpg"))
        .unwrap();
    assert_eq!(original.content_type, "image/jpeg");

    let variant_keys = store.keys(VARIANTS_BUCKET);
    assert_eq!(variant_keys.len(), VARIANTS_PER_PHOTO);
    for key in &variant_keys {
        let object = store.get(VARIANTS_BUCKET, key).unwrap();
        assert_eq!(
            object.cache_control.as_deref(),
            Some("public, max-age=31536000, immutable")
        );
        let ext = key.rsplit('.').next().unwrap();
        assert_eq!(object.content_type, format!("image/{ext}"));
    }

    // Rows.
    let photo = PhotoRepo::find_by_id(&pool, photo_id).await.unwrap().unwrap();
    assert_eq!(photo.alt.as_deref(), Some("sunset.png"));
    assert_eq!(photo.width, Some(480));
    assert_eq!(photo.height, Some(360));

    let variants = PhotoVariantRepo::list_by_photos(&pool, &[photo_id]).await.unwrap();
    assert_eq!(variants.len(), VARIANTS_PER_PHOTO);
    // Thumbs shrink to 400 wide; web and retina are wider than the source
    // and keep its size.
    for variant in &variants {
        let expected = if variant.kind == "thumb" { (400, 300) } else { (480, 360) };
        assert_eq!(
            (variant.width, variant.height),
            expected,
            "{} {}",
            variant.kind,
            variant.format
        );
    }
    for kind in ["thumb", "web", "retina"] {
        assert_eq!(variants.iter().filter(|v| v.kind == kind).count(), 3, "{kind}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_links_photo_into_collection(pool: PgPool) {
    let collection_id = create_collection(&pool, "uploads").await;
    let png = sample_png(64, 48);

    let app = common::build_test_app(pool.clone());
    let response = post_multipart(
        app,
        "/api/upload",
        &[
            ("collection_id", None, collection_id.as_bytes()),
            ("file", Some("tiny.png"), &png[..]),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let photo_id = body_json(response).await["photoId"].clone();

    let app = common::build_test_app(pool);
    let detail = body_json(get(app, &format!("/api/collections/{collection_id}")).await).await;
    assert_eq!(detail["photos"][0]["id"], photo_id);
    assert_eq!(detail["photos"][0]["sortIndex"], 100);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_ignores_unknown_collection(pool: PgPool) {
    let png = sample_png(32, 32);

    let app = common::build_test_app(pool);
    let response = post_multipart(
        app,
        "/api/upload",
        &[
            ("file", Some("tiny.png"), &png[..]),
            ("collection_id", None, uuid::Uuid::new_v4().to_string().as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_photo_removes_objects_and_row(pool: PgPool) {
    let png = sample_png(64, 64);
    let (app, store) = common::build_test_app_with_store(pool.clone());
    let response = post_multipart(app, "/api/upload", &[("file", Some("a.png"), &png[..])]).await;
    let photo_id: DbId = body_json(response).await["photoId"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    // An unrelated object under another photo's prefix must survive.
    let other_key = "variants/someone-else/keep_400.webp".to_string();
    store
        .put_object(
            VARIANTS_BUCKET,
            &other_key,
            vec![1, 2, 3],
            studio_storage::PutOptions {
                content_type: "image/webp",
                cache_control: None,
            },
        )
        .await
        .unwrap();

    let app = common::build_test_app_on_store(pool.clone(), store.clone());
    let response = delete(app, &format!("/api/photos/{photo_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));

    assert!(store.keys(ORIGINALS_BUCKET).is_empty());
    assert_eq!(store.keys(VARIANTS_BUCKET), vec![other_key]);
    assert!(PhotoRepo::find_by_id(&pool, photo_id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_missing_photo_is_ok(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/photos/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::OK);
}
