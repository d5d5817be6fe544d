//! Repository for the `collection_photos` membership table.

use sqlx::PgPool;
use studio_core::collection::DEFAULT_SORT_INDEX;
use studio_core::types::DbId;

use crate::models::collection::{CollectionPhoto, CollectionPhotoEntry, CreateCollectionPhoto};

const COLUMNS: &str = "collection_id, photo_id, sort_index, is_featured, created_at";

/// Provides membership operations between collections and photos.
pub struct CollectionPhotoRepo;

impl CollectionPhotoRepo {
    /// Link a photo into a collection. Fails with a primary key violation if
    /// the photo is already a member.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateCollectionPhoto,
    ) -> Result<CollectionPhoto, sqlx::Error> {
        let query = format!(
            "INSERT INTO collection_photos (collection_id, photo_id, sort_index, is_featured)
             VALUES ($1, $2, COALESCE($3, $4), COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollectionPhoto>(&query)
            .bind(input.collection_id)
            .bind(input.photo_id)
            .bind(input.sort_index)
            .bind(DEFAULT_SORT_INDEX)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// Link a photo into a collection, or update its sort index and featured
    /// flag if it is already a member.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreateCollectionPhoto,
    ) -> Result<CollectionPhoto, sqlx::Error> {
        let query = format!(
            "INSERT INTO collection_photos (collection_id, photo_id, sort_index, is_featured)
             VALUES ($1, $2, COALESCE($3, $4), COALESCE($5, false))
             ON CONFLICT (collection_id, photo_id) DO UPDATE SET
                sort_index  = EXCLUDED.sort_index,
                is_featured = EXCLUDED.is_featured
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollectionPhoto>(&query)
            .bind(input.collection_id)
            .bind(input.photo_id)
            .bind(input.sort_index)
            .bind(DEFAULT_SORT_INDEX)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// List the photos in a collection ordered by sort index.
    pub async fn list_entries(
        pool: &PgPool,
        collection_id: DbId,
    ) -> Result<Vec<CollectionPhotoEntry>, sqlx::Error> {
        sqlx::query_as::<_, CollectionPhotoEntry>(
            "SELECT p.id AS photo_id, p.title, p.alt, p.width, p.height, p.created_at,
                    cp.sort_index, cp.is_featured
             FROM collection_photos cp
             JOIN photos p ON p.id = cp.photo_id
             WHERE cp.collection_id = $1
             ORDER BY cp.sort_index ASC, cp.created_at ASC",
        )
        .bind(collection_id)
        .fetch_all(pool)
        .await
    }

    /// Apply a batch of sort index changes atomically.
    ///
    /// Photos that are not members of the collection are skipped. Returns
    /// the number of memberships updated.
    pub async fn reorder(
        pool: &PgPool,
        collection_id: DbId,
        orders: &[(DbId, i32)],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;

        for (photo_id, sort_index) in orders {
            let result = sqlx::query(
                "UPDATE collection_photos SET sort_index = $3
                 WHERE collection_id = $1 AND photo_id = $2",
            )
            .bind(collection_id)
            .bind(photo_id)
            .bind(sort_index)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(%collection_id, requested = orders.len(), updated, "Reordered collection");
        Ok(updated)
    }

    /// Remove a photo from a collection without deleting the photo.
    /// Returns `true` if a membership was removed.
    pub async fn remove(
        pool: &PgPool,
        collection_id: DbId,
        photo_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM collection_photos WHERE collection_id = $1 AND photo_id = $2",
        )
        .bind(collection_id)
        .bind(photo_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
