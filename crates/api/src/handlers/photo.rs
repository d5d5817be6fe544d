//! Handlers for the `/photos` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use studio_core::types::DbId;
use studio_core::variants::{original_key, variant_prefix};
use studio_db::repositories::PhotoRepo;
use studio_storage::delete_prefix;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// DELETE /api/photos/{id}
///
/// Removes the archived original, every object under the photo's variant
/// prefix, and finally the row (which cascades to variants and memberships).
/// Deleting a photo that is already gone succeeds.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OkResponse>> {
    let storage = &state.config.storage;

    let original = PhotoRepo::find_by_id(&state.pool, id)
        .await?
        .map(|photo| photo.storage_key)
        .unwrap_or_else(|| original_key(id));
    state
        .store
        .delete_object(&storage.originals_bucket, &original)
        .await?;

    let removed =
        delete_prefix(state.store.as_ref(), &storage.variants_bucket, &variant_prefix(id)).await?;

    let deleted = PhotoRepo::delete(&state.pool, id).await?;

    tracing::info!(photo_id = %id, variants_removed = removed, row_deleted = deleted, "Photo deleted");
    Ok(Json(OkResponse { ok: true }))
}
