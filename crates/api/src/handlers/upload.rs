//! Photo upload pipeline.
//!
//! `POST /api/upload` takes a multipart form with a `file` field and an
//! optional `collection_id`. The original is auto-rotated and archived as
//! JPEG, then every (size, format) cell of the variant table is rendered,
//! uploaded to the public bucket, and recorded.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use studio_core::collection::DEFAULT_SORT_INDEX;
use studio_core::hashing::content_hash;
use studio_core::imaging::{self, PreparedOriginal, RenderedVariant, Watermark};
use studio_core::types::DbId;
use studio_core::variants::{
    original_key, pick_upload_thumbnail, variant_key, VariantEncoding, VariantSize,
    VARIANT_CACHE_CONTROL, VARIANT_FORMATS, VARIANT_SIZES,
};
use studio_db::models::collection::CreateCollectionPhoto;
use studio_db::models::photo::{CreatePhoto, CreatePhotoVariant};
use studio_db::repositories::{CollectionPhotoRepo, PhotoRepo};
use studio_storage::{public_url, PutOptions};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub photo_id: DbId,
    pub width: u32,
    pub height: u32,
    pub thumbnail_url: Option<String>,
    pub variant_count: usize,
}

struct UploadForm {
    file_name: Option<String>,
    data: Vec<u8>,
    collection_id: Option<String>,
}

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let form = read_form(multipart).await?;
    let photo_id = DbId::new_v4();

    // --- Original ---
    let data = form.data;
    let prepared = run_blocking(move || imaging::prepare_original(&data)).await?;
    let PreparedOriginal {
        image,
        jpeg,
        width,
        height,
        exif,
    } = prepared;

    let storage = &state.config.storage;
    let storage_key = original_key(photo_id);
    state
        .store
        .put_object(
            &storage.originals_bucket,
            &storage_key,
            jpeg,
            PutOptions {
                content_type: "image/jpeg",
                cache_control: None,
            },
        )
        .await?;
    tracing::debug!(%photo_id, key = %storage_key, width, height, "Stored original");

    // --- Variants ---
    let watermark = state.watermark.clone();
    let rendered = run_blocking(move || render_all(&image, watermark.as_deref())).await?;

    let mut variants = Vec::with_capacity(rendered.len());
    for (size, encoding, variant) in rendered {
        let hash = content_hash(&variant.bytes);
        let key = variant_key(photo_id, &hash, size.width, encoding.format);
        let bytes = variant.bytes.len() as i64;

        state
            .store
            .put_object(
                &storage.variants_bucket,
                &key,
                variant.bytes,
                PutOptions {
                    content_type: encoding.format.content_type(),
                    cache_control: Some(VARIANT_CACHE_CONTROL),
                },
            )
            .await?;

        variants.push(CreatePhotoVariant {
            photo_id,
            kind: size.kind.as_str().to_string(),
            format: encoding.format.as_str().to_string(),
            width: variant.width as i32,
            height: variant.height as i32,
            bytes,
            url: public_url(&storage.public_base_url, &key),
        });
    }

    // --- Rows ---
    let photo = CreatePhoto {
        id: photo_id,
        storage_key,
        width: Some(width as i32),
        height: Some(height as i32),
        exif,
        title: None,
        alt: form.file_name,
    };
    PhotoRepo::create_with_variants(&state.pool, &photo, &variants).await?;

    if let Some(raw) = form.collection_id.as_deref() {
        link_to_collection(&state, photo_id, raw).await;
    }

    tracing::info!(%photo_id, variant_count = variants.len(), "Photo uploaded");

    Ok(Json(UploadResponse {
        photo_id,
        width,
        height,
        thumbnail_url: pick_upload_thumbnail(&variants).map(|v| v.url.clone()),
        variant_count: variants.len(),
    }))
}

async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut file: Option<(Option<String>, Vec<u8>)> = None;
    let mut collection_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                file = Some((file_name, data.to_vec()));
            }
            "collection_id" => {
                let text = field.text().await?;
                collection_id = Some(text.trim().to_string()).filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let (file_name, data) = file.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;

    Ok(UploadForm {
        file_name,
        data,
        collection_id,
    })
}

fn render_all(
    image: &image::DynamicImage,
    watermark: Option<&Watermark>,
) -> Result<Vec<(VariantSize, VariantEncoding, RenderedVariant)>, imaging::ImagingError> {
    let mut out = Vec::with_capacity(VARIANT_SIZES.len() * VARIANT_FORMATS.len());
    for size in VARIANT_SIZES {
        for encoding in VARIANT_FORMATS {
            let rendered = imaging::render_variant(image, size, encoding, watermark)?;
            out.push((size, encoding, rendered));
        }
    }
    Ok(out)
}

/// Membership is best effort: a bad or unknown collection id is logged and
/// the upload still succeeds.
async fn link_to_collection(state: &AppState, photo_id: DbId, raw_collection_id: &str) {
    let collection_id = match raw_collection_id.parse::<DbId>() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(%photo_id, collection_id = raw_collection_id, error = %e, "Invalid collection id on upload");
            return;
        }
    };

    let link = CreateCollectionPhoto {
        collection_id,
        photo_id,
        sort_index: Some(DEFAULT_SORT_INDEX),
        is_featured: Some(false),
    };
    if let Err(e) = CollectionPhotoRepo::insert(&state.pool, &link).await {
        tracing::warn!(%photo_id, %collection_id, error = %e, "Failed to add uploaded photo to collection");
    }
}

/// Run CPU-bound image work off the async runtime.
async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, imaging::ImagingError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Image task failed: {e}")))?
        .map_err(AppError::from)
}
