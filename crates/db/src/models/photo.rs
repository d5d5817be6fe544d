//! Photo entity models and DTOs.
//!
//! Covers two related tables:
//! - `photos` -- one row per uploaded original
//! - `photo_variants` -- resized/re-encoded derivatives of a photo

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};
use studio_core::variants::VariantRef;

// ---------------------------------------------------------------------------
// Photo
// ---------------------------------------------------------------------------

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub storage_key: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub exif: Option<serde_json::Value>,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a photo. The id is minted by the caller because the
/// storage keys are derived from it before the row exists.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhoto {
    pub id: DbId,
    pub storage_key: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub exif: Option<serde_json::Value>,
    pub title: Option<String>,
    pub alt: Option<String>,
}

// ---------------------------------------------------------------------------
// PhotoVariant
// ---------------------------------------------------------------------------

/// A row from the `photo_variants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotoVariant {
    pub id: DbId,
    pub photo_id: DbId,
    pub kind: String,
    pub format: String,
    pub width: i32,
    pub height: i32,
    pub bytes: i64,
    pub url: String,
    pub created_at: Timestamp,
}

/// DTO for recording an uploaded variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhotoVariant {
    pub photo_id: DbId,
    pub kind: String,
    pub format: String,
    pub width: i32,
    pub height: i32,
    pub bytes: i64,
    pub url: String,
}

impl VariantRef for PhotoVariant {
    fn kind(&self) -> &str {
        &self.kind
    }
    fn format(&self) -> &str {
        &self.format
    }
    fn url(&self) -> &str {
        &self.url
    }
}

impl VariantRef for CreatePhotoVariant {
    fn kind(&self) -> &str {
        &self.kind
    }
    fn format(&self) -> &str {
        &self.format
    }
    fn url(&self) -> &str {
        &self.url
    }
}
