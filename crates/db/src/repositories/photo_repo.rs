//! Repository for the `photos` table.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::photo::{CreatePhoto, CreatePhotoVariant, Photo, PhotoVariant};
use crate::repositories::PhotoVariantRepo;

const COLUMNS: &str = "id, storage_key, width, height, exif, title, alt, created_at";

/// Provides CRUD operations for photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Insert a photo and all of its variants in one transaction.
    pub async fn create_with_variants(
        pool: &PgPool,
        photo: &CreatePhoto,
        variants: &[CreatePhotoVariant],
    ) -> Result<(Photo, Vec<PhotoVariant>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO photos (id, storage_key, width, height, exif, title, alt)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Photo>(&query)
            .bind(photo.id)
            .bind(&photo.storage_key)
            .bind(photo.width)
            .bind(photo.height)
            .bind(&photo.exif)
            .bind(&photo.title)
            .bind(&photo.alt)
            .fetch_one(&mut *tx)
            .await?;

        let variants = PhotoVariantRepo::create_many(&mut *tx, variants).await?;

        tx.commit().await?;
        Ok((created, variants))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a photo. Variants and collection memberships
    /// cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
