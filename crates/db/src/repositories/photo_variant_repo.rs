//! Repository for the `photo_variants` table.

use sqlx::{PgExecutor, PgPool};
use studio_core::types::DbId;

use crate::models::photo::{CreatePhotoVariant, PhotoVariant};

const COLUMNS: &str = "id, photo_id, kind, format, width, height, bytes, url, created_at";

/// Provides insert and lookup operations for photo variants.
pub struct PhotoVariantRepo;

impl PhotoVariantRepo {
    /// Insert a batch of variants with a single statement.
    pub async fn create_many<'e, E>(
        executor: E,
        inputs: &[CreatePhotoVariant],
    ) -> Result<Vec<PhotoVariant>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let photo_ids: Vec<DbId> = inputs.iter().map(|v| v.photo_id).collect();
        let kinds: Vec<String> = inputs.iter().map(|v| v.kind.clone()).collect();
        let formats: Vec<String> = inputs.iter().map(|v| v.format.clone()).collect();
        let widths: Vec<i32> = inputs.iter().map(|v| v.width).collect();
        let heights: Vec<i32> = inputs.iter().map(|v| v.height).collect();
        let bytes: Vec<i64> = inputs.iter().map(|v| v.bytes).collect();
        let urls: Vec<String> = inputs.iter().map(|v| v.url.clone()).collect();

        let query = format!(
            "INSERT INTO photo_variants (photo_id, kind, format, width, height, bytes, url)
             SELECT * FROM UNNEST($1::uuid[], $2::text[], $3::text[], $4::int4[],
                                  $5::int4[], $6::int8[], $7::text[])
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhotoVariant>(&query)
            .bind(photo_ids)
            .bind(kinds)
            .bind(formats)
            .bind(widths)
            .bind(heights)
            .bind(bytes)
            .bind(urls)
            .fetch_all(executor)
            .await
    }

    /// Load the variants of several photos at once.
    pub async fn list_by_photos(
        pool: &PgPool,
        photo_ids: &[DbId],
    ) -> Result<Vec<PhotoVariant>, sqlx::Error> {
        if photo_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM photo_variants
             WHERE photo_id = ANY($1)
             ORDER BY photo_id, width ASC, format ASC"
        );
        sqlx::query_as::<_, PhotoVariant>(&query)
            .bind(photo_ids)
            .fetch_all(pool)
            .await
    }
}
