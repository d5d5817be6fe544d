//! Read-only access to the connected user's Lightroom catalog.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::config::AdobeConfig;
use crate::{ensure_success, LightroomError};

/// Number of assets requested per listing.
pub const ASSET_PAGE_LIMIT: u32 = 50;

/// Adobe prefixes JSON bodies with an infinite loop to block JSON hijacking.
static WHILE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^while\s*\(\s*1\s*\)\s*\{\s*\}\s*").expect("valid regex"));

/// A catalog asset reshaped for the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightroomAsset {
    pub id: Value,
    pub created: Value,
    pub updated: Value,
    /// The asset's `links` object.
    pub renditions: Value,
    /// The asset's `payload` object.
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightroomPhotos {
    pub catalog_id: String,
    pub photos: Vec<LightroomAsset>,
}

pub struct LightroomClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LightroomClient {
    pub fn new(config: &AdobeConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &AdobeConfig) -> Self {
        Self {
            client,
            base_url: config.lightroom_base_url.clone(),
            api_key: config.client_id.clone(),
        }
    }

    /// Fetch the user's catalog, then the first page of its assets.
    pub async fn list_photos(&self, access_token: &str) -> Result<LightroomPhotos, LightroomError> {
        let catalog = self
            .get_json(&format!("{}/catalog", self.base_url), access_token, "Catalog fetch failed")
            .await?;

        let catalog_id = catalog
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| LightroomError::InvalidResponse(format!("No catalog id found: {catalog}")))?
            .to_string();

        let assets = self
            .get_json(
                &format!(
                    "{}/catalogs/{catalog_id}/assets?limit={ASSET_PAGE_LIMIT}",
                    self.base_url
                ),
                access_token,
                "Assets fetch failed",
            )
            .await?;

        tracing::debug!(%catalog_id, "Fetched Lightroom assets");

        Ok(LightroomPhotos {
            catalog_id,
            photos: assets_from_listing(&assets),
        })
    }

    async fn get_json(
        &self,
        url: &str,
        access_token: &str,
        context: &'static str,
    ) -> Result<Value, LightroomError> {
        let response = self
            .client
            .get(url)
            .header("X-API-Key", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let text = ensure_success(response, context).await?.text().await?;
        parse_guarded_json(&text)
    }
}

/// Parse a Lightroom response body, dropping the `while (1) {}` guard.
pub fn parse_guarded_json(text: &str) -> Result<Value, LightroomError> {
    let cleaned = WHILE_PREFIX_RE.replace(text, "");
    serde_json::from_str(&cleaned)
        .map_err(|e| LightroomError::InvalidResponse(format!("invalid JSON: {e}")))
}

fn assets_from_listing(listing: &Value) -> Vec<LightroomAsset> {
    let Some(resources) = listing.get("resources").and_then(Value::as_array) else {
        return Vec::new();
    };

    let field = |asset: &Value, name: &str| asset.get(name).cloned().unwrap_or(Value::Null);
    let object = |asset: &Value, name: &str| {
        asset
            .get(name)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()))
    };

    resources
        .iter()
        .map(|asset| LightroomAsset {
            id: field(asset, "id"),
            created: field(asset, "created"),
            updated: field(asset, "updated"),
            renditions: object(asset, "links"),
            metadata: object(asset, "payload"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::DEFAULT_IMS_BASE_URL;

    fn config(base: &str) -> AdobeConfig {
        AdobeConfig {
            client_id: "api-key".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost/cb".into(),
            scopes: "openid".into(),
            connect_secret: "admin".into(),
            ims_base_url: DEFAULT_IMS_BASE_URL.into(),
            lightroom_base_url: base.into(),
        }
    }

    #[test]
    fn strips_while_guard() {
        let value = parse_guarded_json("while (1) {}\n{\"id\":\"cat\"}").unwrap();
        assert_eq!(value, json!({"id": "cat"}));

        let compact = parse_guarded_json("while(1){}{\"a\":1}").unwrap();
        assert_eq!(compact, json!({"a": 1}));
    }

    #[test]
    fn plain_json_is_untouched() {
        assert_eq!(parse_guarded_json("[1,2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(
            parse_guarded_json("while (1) {} nope"),
            Err(LightroomError::InvalidResponse(_))
        );
    }

    #[test]
    fn assets_default_missing_objects() {
        let listing = json!({"resources": [
            {"id": "a1", "created": "2024-01-01", "updated": "2024-01-02",
             "links": {"self": {"href": "x"}}, "payload": {"captureDate": "c"}},
            {"id": "a2"}
        ]});
        let assets = assets_from_listing(&listing);
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].renditions, json!({"self": {"href": "x"}}));
        assert_eq!(assets[0].metadata, json!({"captureDate": "c"}));
        assert_eq!(assets[1].renditions, json!({}));
        assert_eq!(assets[1].metadata, json!({}));
        assert_eq!(assets[1].created, Value::Null);
    }

    #[test]
    fn listing_without_resources_is_empty() {
        assert!(assets_from_listing(&json!({})).is_empty());
    }

    #[tokio::test]
    async fn list_photos_walks_catalog_then_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog"))
            .and(header("X-API-Key", "api-key"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("while (1) {}\n{\"id\":\"cat-1\"}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/catalogs/cat-1/assets"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "while (1) {}\n{\"resources\":[{\"id\":\"asset-1\",\"created\":\"c\",\"updated\":\"u\"}]}",
            ))
            .mount(&server)
            .await;

        let client = LightroomClient::new(&config(&server.uri()));
        let photos = client.list_photos("tok").await.unwrap();

        assert_eq!(photos.catalog_id, "cat-1");
        assert_eq!(photos.photos.len(), 1);
        assert_eq!(photos.photos[0].id, json!("asset-1"));

        let body = serde_json::to_value(&photos).unwrap();
        assert_eq!(body["catalogId"], "cat-1");
    }

    #[tokio::test]
    async fn catalog_failure_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = LightroomClient::new(&config(&server.uri()));
        let err = client.list_photos("tok").await.unwrap_err();

        assert_matches!(err, LightroomError::Api { status: 403, ref body, .. } if body == "forbidden");
        assert_eq!(err.to_string(), "Catalog fetch failed (403): forbidden");
    }

    #[tokio::test]
    async fn missing_catalog_id_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = LightroomClient::new(&config(&server.uri()));
        assert_matches!(
            client.list_photos("tok").await,
            Err(LightroomError::InvalidResponse(msg)) if msg.starts_with("No catalog id found")
        );
    }
}
