//! Adobe IMS OAuth client.

use serde::Deserialize;

use crate::config::AdobeConfig;
use crate::{ensure_success, LightroomError};

/// Token endpoint response for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// HTTP client for the Adobe IMS authorize and token endpoints.
#[derive(Clone)]
pub struct ImsClient {
    client: reqwest::Client,
    config: AdobeConfig,
}

impl ImsClient {
    pub fn new(config: AdobeConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: AdobeConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AdobeConfig {
        &self.config
    }

    /// URL the admin's browser is sent to when connecting Adobe.
    pub fn authorize_url(&self) -> Result<String, LightroomError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/authorize", self.config.ims_base_url),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", self.config.scopes.as_str()),
            ],
        )
        .map_err(|e| LightroomError::InvalidResponse(format!("invalid IMS base URL: {e}")))?;
        Ok(url.into())
    }

    /// Exchange an authorization code from the callback for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, LightroomError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.request_token(&form, "Token exchange failed").await
    }

    /// Trade a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, LightroomError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        self.request_token(&form, "Failed to refresh Adobe token").await
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
        context: &'static str,
    ) -> Result<TokenResponse, LightroomError> {
        let response = self
            .client
            .post(format!("{}/token", self.config.ims_base_url))
            .form(form)
            .send()
            .await?;

        let response = ensure_success(response, context).await?;
        Ok(response.json::<TokenResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_IMS_BASE_URL, DEFAULT_LIGHTROOM_BASE_URL};

    fn client() -> ImsClient {
        ImsClient::new(AdobeConfig {
            client_id: "abc123".into(),
            client_secret: "s3cret".into(),
            redirect_uri: "https://studio.example.com/api/auth/adobe/callback".into(),
            scopes: "openid,lr_partner_apis,offline_access".into(),
            connect_secret: "admin".into(),
            ims_base_url: DEFAULT_IMS_BASE_URL.into(),
            lightroom_base_url: DEFAULT_LIGHTROOM_BASE_URL.into(),
        })
    }

    #[test]
    fn authorize_url_carries_client_and_scope() {
        let url = client().authorize_url().unwrap();
        let parsed = reqwest::Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("ims-na1.adobelogin.com"));
        assert_eq!(parsed.path(), "/ims/authorize");

        let params: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(params.contains(&("client_id".into(), "abc123".into())));
        assert!(params.contains(&("response_type".into(), "code".into())));
        assert!(params.contains(&(
            "redirect_uri".into(),
            "https://studio.example.com/api/auth/adobe/callback".into()
        )));
        assert!(params.contains(&(
            "scope".into(),
            "openid,lr_partner_apis,offline_access".into()
        )));
    }

    #[test]
    fn authorize_url_never_leaks_client_secret() {
        let url = client().authorize_url().unwrap();
        assert!(!url.contains("s3cret"));
    }

    #[test]
    fn token_response_tolerates_missing_refresh_token() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":86399}"#).unwrap();
        assert_eq!(resp.access_token, "a");
        assert!(resp.refresh_token.is_none());
        assert_eq!(resp.expires_in, 86399);
    }
}
