//! Collection entity models and DTOs.
//!
//! Covers two related tables:
//! - `collections` -- named, publishable photo sets
//! - `collection_photos` -- ordered membership of photos in a collection

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// A row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_published: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new collection. Name and slug are expected to be
/// validated and trimmed already.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollection {
    pub slug: String,
    pub name: String,
    /// Defaults to `false` if omitted.
    pub is_published: Option<bool>,
}

/// A collection with its photo count and the photo chosen as its cover.
#[derive(Debug, Clone, FromRow)]
pub struct CollectionSummaryRow {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub photo_count: i64,
    pub cover_photo_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// CollectionPhoto
// ---------------------------------------------------------------------------

/// A row from the `collection_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectionPhoto {
    pub collection_id: DbId,
    pub photo_id: DbId,
    pub sort_index: i32,
    pub is_featured: bool,
    pub created_at: Timestamp,
}

/// DTO for linking a photo into a collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionPhoto {
    pub collection_id: DbId,
    pub photo_id: DbId,
    /// Defaults to 100 if omitted.
    pub sort_index: Option<i32>,
    /// Defaults to `false` if omitted.
    pub is_featured: Option<bool>,
}

/// A photo as it appears inside one collection: the photo row joined with
/// its membership attributes.
#[derive(Debug, Clone, FromRow)]
pub struct CollectionPhotoEntry {
    pub photo_id: DbId,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: Timestamp,
    pub sort_index: i32,
    pub is_featured: bool,
}
