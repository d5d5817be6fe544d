//! Decode, orient, resize, watermark, and encode photo uploads.
//!
//! All functions here are CPU-bound and synchronous; callers on the async
//! runtime are expected to run them on a blocking thread.

use std::borrow::Cow;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use crate::variants::{
    VariantEncoding, VariantFormat, VariantSize, ORIGINAL_JPEG_QUALITY, WATERMARK_WIDTH_RATIO,
};

/// rav1e speed preset (1 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 8;

#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Unable to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid watermark: {0}")]
    Watermark(String),
}

// ---------------------------------------------------------------------------
// Original
// ---------------------------------------------------------------------------

/// An upload after orientation correction, ready for variant rendering.
#[derive(Debug)]
pub struct PreparedOriginal {
    /// Decoded pixels with EXIF orientation applied.
    pub image: DynamicImage,
    /// The original re-encoded as high quality JPEG for archival storage.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Raw EXIF block, serialized as `{"type":"Buffer","data":[..]}`.
    pub exif: Option<serde_json::Value>,
}

/// Decode an uploaded image, auto-rotate it from its EXIF orientation and
/// re-encode it as the archival JPEG.
pub fn prepare_original(bytes: &[u8]) -> Result<PreparedOriginal, ImagingError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;

    let exif = decoder.exif_metadata()?;
    let orientation = exif
        .as_deref()
        .and_then(Orientation::from_exif_chunk)
        .unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);

    let jpeg = encode(&image, VariantFormat::Jpeg, ORIGINAL_JPEG_QUALITY)?;

    Ok(PreparedOriginal {
        width: image.width(),
        height: image.height(),
        exif: exif.map(|raw| exif_json(&raw)),
        image,
        jpeg,
    })
}

/// Node-style buffer JSON, the shape existing `photos.exif` rows use.
fn exif_json(raw: &[u8]) -> serde_json::Value {
    serde_json::json!({ "type": "Buffer", "data": raw })
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Encoded bytes of one variant and the dimensions they decode to.
#[derive(Debug)]
pub struct RenderedVariant {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Render one (size, format) cell of the variant table.
///
/// The image is shrunk to `size.width` keeping its aspect ratio and is never
/// enlarged. Watermarked sizes get the mark composited bottom-right.
pub fn render_variant(
    source: &DynamicImage,
    size: VariantSize,
    encoding: VariantEncoding,
    watermark: Option<&Watermark>,
) -> Result<RenderedVariant, ImagingError> {
    let resized = fit_width(source, size.width);

    let composed = match watermark {
        Some(mark) if size.kind.watermarked() => {
            let mut canvas = resized.to_rgba8();
            mark.apply(&mut canvas, size.width);
            Cow::Owned(DynamicImage::ImageRgba8(canvas))
        }
        _ => resized,
    };

    let bytes = encode(&composed, encoding.format, encoding.quality)?;
    Ok(RenderedVariant {
        bytes,
        width: composed.width(),
        height: composed.height(),
    })
}

fn fit_width(source: &DynamicImage, width: u32) -> Cow<'_, DynamicImage> {
    if source.width() > width {
        Cow::Owned(source.resize(width, u32::MAX, FilterType::Lanczos3))
    } else {
        Cow::Borrowed(source)
    }
}

/// Encode as opaque RGB in the requested format.
///
/// WebP output is lossless: the `image` encoder has no lossy mode, so the
/// quality setting only applies to AVIF and JPEG.
pub fn encode(
    image: &DynamicImage,
    format: VariantFormat,
    quality: u8,
) -> Result<Vec<u8>, ImagingError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buf = Vec::new();
    match format {
        VariantFormat::Jpeg => {
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?
        }
        VariantFormat::Webp => rgb.write_with_encoder(WebPEncoder::new_lossless(&mut buf))?,
        VariantFormat::Avif => rgb.write_with_encoder(AvifEncoder::new_with_speed_quality(
            &mut buf, AVIF_SPEED, quality,
        ))?,
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Watermark
// ---------------------------------------------------------------------------

/// Studio watermark composited onto web and retina variants.
#[derive(Debug, Clone)]
pub struct Watermark {
    image: RgbaImage,
}

impl Watermark {
    /// Decode a base64 PNG, as provided by `WATERMARK_PNG_BASE64`.
    pub fn from_base64(encoded: &str) -> Result<Self, ImagingError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ImagingError::Watermark(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImagingError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(ImagingError::Watermark("watermark has no pixels".into()));
        }
        Ok(Self { image })
    }

    /// Scale the mark to a fraction of `nominal_width` and blend it over the
    /// bottom-right corner of `canvas`.
    fn apply(&self, canvas: &mut RgbaImage, nominal_width: u32) {
        let mark_width = (f64::from(nominal_width) * WATERMARK_WIDTH_RATIO).floor() as u32;
        if mark_width == 0 {
            return;
        }
        let mark_height = ((u64::from(self.image.height()) * u64::from(mark_width))
            / u64::from(self.image.width()))
        .max(1) as u32;

        let mark = imageops::resize(&self.image, mark_width, mark_height, FilterType::Lanczos3);
        let x = canvas.width().saturating_sub(mark.width());
        let y = canvas.height().saturating_sub(mark.height());
        imageops::overlay(canvas, &mark, i64::from(x), i64::from(y));
    }
}
