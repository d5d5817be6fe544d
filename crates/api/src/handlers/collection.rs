//! Handlers for the `/collections` resource.
//!
//! List and detail responses are reshaped into the camelCase documents the
//! admin UI renders; `create` returns the raw row.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use studio_core::collection::{
    parse_photo_orders, validate_collection_name, validate_slug, DEFAULT_SORT_INDEX,
};
use studio_core::error::CoreError;
use studio_core::types::{DbId, Timestamp};
use studio_core::variants::pick_thumbnail;
use studio_db::models::collection::{Collection, CreateCollection, CreateCollectionPhoto};
use studio_db::models::photo::PhotoVariant;
use studio_db::repositories::{CollectionPhotoRepo, CollectionRepo, PhotoVariantRepo};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::state::AppState;

const SLUG_CONSTRAINT: &str = "uq_collections_slug";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_published: bool,
    pub photo_count: i64,
    /// Thumbnail URL of the cover photo, if the collection has one.
    pub featured_image_url: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetail {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub photos: Vec<CollectionDetailPhoto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetailPhoto {
    pub id: DbId,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: Timestamp,
    pub sort_index: i32,
    pub is_featured: bool,
    pub variants: Vec<VariantSummary>,
}

#[derive(Debug, Serialize)]
pub struct VariantSummary {
    pub id: DbId,
    pub kind: String,
    pub format: String,
    pub width: i32,
    pub height: i32,
    pub bytes: i64,
    pub url: String,
}

impl From<PhotoVariant> for VariantSummary {
    fn from(v: PhotoVariant) -> Self {
        Self {
            id: v.id,
            kind: v.kind,
            format: v.format,
            width: v.width,
            height: v.height,
            bytes: v.bytes,
            url: v.url,
        }
    }
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Body of `POST /collections/add-photo`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhotoRequest {
    pub photo_id: Option<String>,
    pub collection_slug: Option<String>,
    pub sort_index: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub create_if_missing: bool,
    /// Publish the collection when it is created by this request.
    #[serde(default)]
    pub publish: bool,
    pub collection_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhotoResponse {
    pub ok: bool,
    pub collection_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/collections
///
/// Newest first. Each summary carries the photo count and the thumbnail of
/// its cover photo.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CollectionSummary>>> {
    let rows = CollectionRepo::list_summaries(&state.pool).await?;

    let cover_ids: Vec<DbId> = rows.iter().filter_map(|r| r.cover_photo_id).collect();
    let variants = group_by_photo(PhotoVariantRepo::list_by_photos(&state.pool, &cover_ids).await?);

    let summaries = rows
        .into_iter()
        .map(|row| {
            let featured_image_url = row
                .cover_photo_id
                .and_then(|id| variants.get(&id))
                .and_then(|vs| pick_thumbnail(vs))
                .map(|v| v.url.clone());

            CollectionSummary {
                id: row.id,
                slug: row.slug,
                name: row.name,
                is_published: row.is_published,
                photo_count: row.photo_count,
                featured_image_url,
                created_at: row.created_at,
            }
        })
        .collect();

    Ok(Json(summaries))
}

/// POST /api/collections
///
/// Body: `{ name, slug, isPublished? }`. Returns 409 when the slug is taken.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Collection>)> {
    let name = validate_collection_name(body.get("name").and_then(Value::as_str))?;
    let slug = validate_slug(body.get("slug").and_then(Value::as_str))?;
    let is_published = body.get("isPublished").and_then(Value::as_bool);

    let input = CreateCollection {
        slug,
        name,
        is_published,
    };
    let collection = create_collection(&state, &input).await?;

    tracing::info!(collection_id = %collection.id, slug = %collection.slug, "Collection created");
    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /api/collections/{id}
///
/// Photos are ordered by sort index, each with all of its variants.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CollectionDetail>> {
    let collection = CollectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Collection not found".into()))?;

    let entries = CollectionPhotoRepo::list_entries(&state.pool, id).await?;
    let photo_ids: Vec<DbId> = entries.iter().map(|e| e.photo_id).collect();
    let mut variants =
        group_by_photo(PhotoVariantRepo::list_by_photos(&state.pool, &photo_ids).await?);

    let photos = entries
        .into_iter()
        .map(|entry| CollectionDetailPhoto {
            variants: variants
                .remove(&entry.photo_id)
                .unwrap_or_default()
                .into_iter()
                .map(VariantSummary::from)
                .collect(),
            id: entry.photo_id,
            title: entry.title,
            alt: entry.alt,
            width: entry.width,
            height: entry.height,
            created_at: entry.created_at,
            sort_index: entry.sort_index,
            is_featured: entry.is_featured,
        })
        .collect();

    Ok(Json(CollectionDetail {
        id: collection.id,
        slug: collection.slug,
        name: collection.name,
        is_published: collection.is_published,
        created_at: collection.created_at,
        photos,
    }))
}

/// PATCH /api/collections/{id}/reorder
///
/// Body: `{ photoOrders: [{ photoId, sortIndex }] }`. All updates are
/// applied in one transaction; photos not in the collection are skipped.
pub async fn reorder(
    State(state): State<AppState>,
    Path(collection_id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<SuccessResponse>> {
    let orders = parse_photo_orders(&body)?
        .into_iter()
        .map(|order| {
            order
                .photo_id
                .parse::<DbId>()
                .map(|photo_id| (photo_id, order.sort_index))
                .map_err(|_| CoreError::Validation("Each item must have a valid photoId".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let updated = CollectionPhotoRepo::reorder(&state.pool, collection_id, &orders).await?;

    tracing::info!(
        %collection_id,
        requested = orders.len(),
        updated,
        "Collection reordered"
    );
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/collections/{id}/photos/{photo_id}
///
/// Unlinks the photo; the photo itself and its objects are kept.
pub async fn remove_photo(
    State(state): State<AppState>,
    Path((collection_id, photo_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    let removed = CollectionPhotoRepo::remove(&state.pool, collection_id, photo_id).await?;
    tracing::info!(%collection_id, %photo_id, removed, "Photo removed from collection");
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/collections/add-photo
///
/// Links a photo into the collection named by slug, optionally creating the
/// collection first. Re-adding an existing link updates its sort index and
/// featured flag.
pub async fn add_photo(
    State(state): State<AppState>,
    Json(input): Json<AddPhotoRequest>,
) -> AppResult<Json<AddPhotoResponse>> {
    let (Some(photo_id), Some(slug)) = (
        input.photo_id.as_deref().filter(|s| !s.is_empty()),
        input.collection_slug.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "photoId and collectionSlug are required".into(),
        ));
    };

    let photo_id: DbId = photo_id
        .parse()
        .map_err(|_| AppError::BadRequest("photoId must be a valid UUID".into()))?;

    let collection = match CollectionRepo::find_by_slug(&state.pool, slug).await? {
        Some(collection) => collection,
        None if input.create_if_missing => {
            let slug = validate_slug(Some(slug))?;
            let name = input
                .collection_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map_or_else(|| slug.clone(), str::to_string);
            let created = create_collection(
                &state,
                &CreateCollection {
                    slug,
                    name,
                    is_published: Some(input.publish),
                },
            )
            .await?;
            tracing::info!(collection_id = %created.id, slug = %created.slug, "Collection created for add-photo");
            created
        }
        None => return Err(AppError::NotFound("Collection not found".into())),
    };

    CollectionPhotoRepo::upsert(
        &state.pool,
        &CreateCollectionPhoto {
            collection_id: collection.id,
            photo_id,
            sort_index: Some(input.sort_index.unwrap_or(DEFAULT_SORT_INDEX)),
            is_featured: Some(input.is_featured),
        },
    )
    .await?;

    tracing::info!(collection_id = %collection.id, %photo_id, "Photo added to collection");
    Ok(Json(AddPhotoResponse {
        ok: true,
        collection_id: collection.id,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_collection(state: &AppState, input: &CreateCollection) -> AppResult<Collection> {
    CollectionRepo::create(&state.pool, input)
        .await
        .map_err(|err| {
            if is_unique_violation(&err, SLUG_CONSTRAINT) {
                AppError::Core(CoreError::Conflict(
                    "A collection with this slug already exists".into(),
                ))
            } else {
                AppError::Database(err)
            }
        })
}

fn group_by_photo(variants: Vec<PhotoVariant>) -> HashMap<DbId, Vec<PhotoVariant>> {
    let mut grouped: HashMap<DbId, Vec<PhotoVariant>> = HashMap::new();
    for variant in variants {
        grouped.entry(variant.photo_id).or_default().push(variant);
    }
    grouped
}
