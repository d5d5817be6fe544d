//! Request validation for collections and their photo membership.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Sort index assigned when a photo joins a collection without one.
pub const DEFAULT_SORT_INDEX: i32 = 100;

/// Lowercase ASCII letters, digits, and hyphens.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

/// Validate a collection display name, returning the trimmed value.
pub fn validate_collection_name(name: Option<&str>) -> Result<String, CoreError> {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(CoreError::Validation("Collection name is required".into())),
    }
}

/// Validate a collection slug, returning the trimmed value.
pub fn validate_slug(slug: Option<&str>) -> Result<String, CoreError> {
    let trimmed = match slug.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => return Err(CoreError::Validation("Collection slug is required".into())),
    };

    if !SLUG_RE.is_match(trimmed) {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase letters, numbers, and hyphens".into(),
        ));
    }

    Ok(trimmed.to_string())
}

/// One entry of a reorder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoOrder {
    pub photo_id: String,
    pub sort_index: i32,
}

/// Parse the `photoOrders` array out of a reorder request body.
///
/// The body is taken as raw JSON so that shape errors surface as
/// validation failures (400) instead of extractor rejections.
pub fn parse_photo_orders(body: &serde_json::Value) -> Result<Vec<PhotoOrder>, CoreError> {
    let items = body
        .get("photoOrders")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| CoreError::Validation("photoOrders must be an array".into()))?;

    items.iter().map(parse_photo_order).collect()
}

fn parse_photo_order(item: &serde_json::Value) -> Result<PhotoOrder, CoreError> {
    let photo_id = item
        .get("photoId")
        .and_then(serde_json::Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CoreError::Validation("Each item must have a valid photoId".into()))?;

    let sort_index = item
        .get("sortIndex")
        .and_then(numeric_sort_index)
        .ok_or_else(|| {
            CoreError::Validation("Each item must have a numeric sortIndex".into())
        })?;

    Ok(PhotoOrder {
        photo_id: photo_id.to_string(),
        sort_index,
    })
}

/// Accept any JSON number that fits the `INTEGER` column. Fractions round.
fn numeric_sort_index(value: &serde_json::Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    let f = value.as_f64()?.round();
    if f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}
