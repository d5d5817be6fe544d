//! Repository for the `collections` table.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::collection::{Collection, CollectionSummaryRow, CreateCollection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, name, is_published, created_at";

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    ///
    /// A duplicate slug fails with a unique violation on `uq_collections_slug`.
    pub async fn create(pool: &PgPool, input: &CreateCollection) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections (slug, name, is_published)
             VALUES ($1, $2, COALESCE($3, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE slug = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List every collection, newest first, with its photo count and the
    /// photo to use as its cover.
    ///
    /// The cover is the featured photo if any, otherwise the photo with the
    /// lowest sort index.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<CollectionSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, CollectionSummaryRow>(
            "SELECT c.id, c.slug, c.name, c.is_published, c.created_at,
                    (SELECT COUNT(*) FROM collection_photos cp
                      WHERE cp.collection_id = c.id) AS photo_count,
                    (SELECT cp.photo_id FROM collection_photos cp
                      WHERE cp.collection_id = c.id
                      ORDER BY cp.is_featured DESC, cp.sort_index ASC, cp.created_at ASC
                      LIMIT 1) AS cover_photo_id
             FROM collections c
             ORDER BY c.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
