//! Fixed size and format tables for photo variants, plus object key naming.
//!
//! Every upload produces one variant per (size, format) cell:
//!
//! ```text
//!            avif(55)  webp(68)  jpeg(74)
//! thumb  400    x         x         x
//! web   1280    x         x         x      (watermarked)
//! retina 2048   x         x         x      (watermarked)
//! ```

use serde::Serialize;

use crate::types::DbId;

/// Cache header applied to every variant object. Keys embed a content hash
/// so the bytes behind a key never change.
pub const VARIANT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// JPEG quality used for the stored original.
pub const ORIGINAL_JPEG_QUALITY: u8 = 95;

/// Watermark width as a fraction of the variant's nominal width.
pub const WATERMARK_WIDTH_RATIO: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Thumb,
    Web,
    Retina,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Web => "web",
            Self::Retina => "retina",
        }
    }

    /// Thumbnails stay clean; larger sizes carry the studio watermark.
    pub fn watermarked(self) -> bool {
        matches!(self, Self::Web | Self::Retina)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantFormat {
    Avif,
    Webp,
    Jpeg,
}

impl VariantFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
        }
    }

    /// MIME type stored alongside the object.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::Webp => "image/webp",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// A target width for one variant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSize {
    pub kind: VariantKind,
    pub width: u32,
}

/// An encoding for one variant column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantEncoding {
    pub format: VariantFormat,
    pub quality: u8,
}

pub const VARIANT_SIZES: [VariantSize; 3] = [
    VariantSize { kind: VariantKind::Thumb, width: 400 },
    VariantSize { kind: VariantKind::Web, width: 1280 },
    VariantSize { kind: VariantKind::Retina, width: 2048 },
];

pub const VARIANT_FORMATS: [VariantEncoding; 3] = [
    VariantEncoding { format: VariantFormat::Avif, quality: 55 },
    VariantEncoding { format: VariantFormat::Webp, quality: 68 },
    VariantEncoding { format: VariantFormat::Jpeg, quality: 74 },
];

/// Total number of variants produced per upload.
pub const VARIANTS_PER_PHOTO: usize = VARIANT_SIZES.len() * VARIANT_FORMATS.len();

// ---------------------------------------------------------------------------
// Object keys
// ---------------------------------------------------------------------------

/// Key of the re-encoded original in the private originals bucket.
pub fn original_key(photo_id: DbId) -> String {
    format!("originals/{photo_id}.jpg")
}

/// Prefix under which every variant of a photo lives.
pub fn variant_prefix(photo_id: DbId) -> String {
    format!("variants/{photo_id}/")
}

/// Key of one variant in the public variants bucket.
pub fn variant_key(photo_id: DbId, hash: &str, width: u32, format: VariantFormat) -> String {
    format!("{}{hash}_{width}.{}", variant_prefix(photo_id), format.as_str())
}

// ---------------------------------------------------------------------------
// Thumbnail selection
// ---------------------------------------------------------------------------

/// Minimal view of a stored variant used for thumbnail selection.
pub trait VariantRef {
    fn kind(&self) -> &str;
    fn format(&self) -> &str;
    fn url(&self) -> &str;
}

/// Pick the collection cover thumbnail: AVIF thumb, then WebP thumb, then
/// any thumb.
pub fn pick_thumbnail<V: VariantRef>(variants: &[V]) -> Option<&V> {
    let thumb_in = |format: &str| {
        variants
            .iter()
            .find(|v| v.kind() == "thumb" && v.format() == format)
    };
    thumb_in("avif")
        .or_else(|| thumb_in("webp"))
        .or_else(|| variants.iter().find(|v| v.kind() == "thumb"))
}

/// Pick the thumbnail returned by the upload endpoint: WebP thumb, else the
/// first variant produced.
pub fn pick_upload_thumbnail<V: VariantRef>(variants: &[V]) -> Option<&V> {
    variants
        .iter()
        .find(|v| v.kind() == "thumb" && v.format() == "webp")
        .or_else(|| variants.first())
}
