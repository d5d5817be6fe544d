use sqlx::FromRow;
use studio_core::types::Timestamp;

/// A row from the `oauth_tokens` table. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct OAuthToken {
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Token values to store for a provider, replacing any previous row.
#[derive(Debug, Clone)]
pub struct UpsertOAuthToken<'a> {
    pub provider: &'a str,
    pub access_token: &'a str,
    pub refresh_token: Option<&'a str>,
    pub expires_at: Timestamp,
}
