/// Adobe IMS authorization endpoint.
pub const DEFAULT_IMS_BASE_URL: &str = "https://ims-na1.adobelogin.com/ims";

/// Lightroom partner API base.
pub const DEFAULT_LIGHTROOM_BASE_URL: &str = "https://lr.adobe.io/v2";

/// Adobe OAuth client settings.
#[derive(Debug, Clone)]
pub struct AdobeConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Space- or comma-separated scope list requested on connect.
    pub scopes: String,
    /// Shared secret an admin passes to `/auth/adobe/connect`.
    pub connect_secret: String,
    pub ims_base_url: String,
    pub lightroom_base_url: String,
}

impl AdobeConfig {
    /// Load Adobe configuration from environment variables.
    ///
    /// | Env Var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `ADOBE_CLIENT_ID`      | empty (integration disabled)              |
    /// | `ADOBE_CLIENT_SECRET`  | empty                                     |
    /// | `ADOBE_REDIRECT_URI`   | empty                                     |
    /// | `ADOBE_SCOPES`         | `openid,lr_partner_apis,offline_access`   |
    /// | `ADOBE_CONNECT_SECRET` | value of `ADOBE_CLIENT_SECRET`            |
    /// | `ADOBE_IMS_BASE_URL`   | `https://ims-na1.adobelogin.com/ims`      |
    /// | `LIGHTROOM_BASE_URL`   | `https://lr.adobe.io/v2`                  |
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        let client_secret = var("ADOBE_CLIENT_SECRET");

        Self {
            client_id: var("ADOBE_CLIENT_ID"),
            connect_secret: std::env::var("ADOBE_CONNECT_SECRET")
                .unwrap_or_else(|_| client_secret.clone()),
            client_secret,
            redirect_uri: var("ADOBE_REDIRECT_URI"),
            scopes: std::env::var("ADOBE_SCOPES")
                .unwrap_or_else(|_| "openid,lr_partner_apis,offline_access".into()),
            ims_base_url: std::env::var("ADOBE_IMS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMS_BASE_URL.into()),
            lightroom_base_url: std::env::var("LIGHTROOM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LIGHTROOM_BASE_URL.into()),
        }
    }

    /// Whether enough settings exist to talk to Adobe at all.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Check an admin-supplied connect secret. An empty configured secret
    /// never matches.
    pub fn connect_secret_matches(&self, supplied: Option<&str>) -> bool {
        !self.connect_secret.is_empty() && supplied == Some(self.connect_secret.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AdobeConfig {
        AdobeConfig {
            client_id: "id".into(),
            client_secret: "client-secret".into(),
            redirect_uri: "https://studio.example.com/api/auth/adobe/callback".into(),
            scopes: "openid".into(),
            connect_secret: secret.into(),
            ims_base_url: DEFAULT_IMS_BASE_URL.into(),
            lightroom_base_url: DEFAULT_LIGHTROOM_BASE_URL.into(),
        }
    }

    #[test]
    fn connect_secret_must_match_exactly() {
        let cfg = config("hunter2");
        assert!(cfg.connect_secret_matches(Some("hunter2")));
        assert!(!cfg.connect_secret_matches(Some("hunter")));
        assert!(!cfg.connect_secret_matches(None));
    }

    #[test]
    fn empty_connect_secret_never_matches() {
        let cfg = config("");
        assert!(!cfg.connect_secret_matches(Some("")));
        assert!(!cfg.connect_secret_matches(None));
    }
}
