//! Adobe token lifecycle: store on connect, refresh before expiry.

use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;

use studio_core::types::Timestamp;
use studio_db::models::oauth_token::{OAuthToken, UpsertOAuthToken};
use studio_db::repositories::OAuthTokenRepo;
use studio_db::DbPool;

use crate::ims::{ImsClient, TokenResponse};
use crate::LightroomError;

/// Provider key for rows in `oauth_tokens`.
pub const ADOBE_PROVIDER: &str = "adobe";

/// Tokens are treated as expired this long before Adobe says they are.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// The current Adobe token set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Timestamp,
}

impl StoredTokens {
    /// Build from a token endpoint response received at `now`.
    ///
    /// Fails if `expires_in` does not yield a representable timestamp.
    pub fn from_response(response: &TokenResponse, now: Timestamp) -> Result<Self, LightroomError> {
        let expires_at = response
            .expires_in
            .checked_sub(EXPIRY_MARGIN_SECS)
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                LightroomError::InvalidResponse(format!(
                    "expires_in out of range: {}",
                    response.expires_in
                ))
            })?;

        Ok(Self {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone(),
            expires_at,
        })
    }

    /// A token is refreshed only once expired and only if a refresh token
    /// exists. Without one the stale access token is handed out as-is.
    pub fn needs_refresh(&self, now: Timestamp) -> bool {
        now >= self.expires_at && self.refresh_token.is_some()
    }

    /// Apply a refresh response, keeping the previous refresh token when
    /// Adobe does not rotate it.
    pub fn refreshed(
        &self,
        response: &TokenResponse,
        now: Timestamp,
    ) -> Result<Self, LightroomError> {
        let mut next = Self::from_response(response, now)?;
        if next.refresh_token.is_none() {
            next.refresh_token = self.refresh_token.clone();
        }
        Ok(next)
    }
}

impl From<OAuthToken> for StoredTokens {
    fn from(row: OAuthToken) -> Self {
        Self {
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            expires_at: row.expires_at,
        }
    }
}

/// Token cache in front of the `oauth_tokens` table.
///
/// Reads hit the in-memory copy first and fall back to the database, so a
/// restarted server keeps its Adobe connection.
pub struct TokenStore {
    pool: DbPool,
    ims: ImsClient,
    cache: RwLock<Option<StoredTokens>>,
}

impl TokenStore {
    pub fn new(pool: DbPool, ims: ImsClient) -> Self {
        Self {
            pool,
            ims,
            cache: RwLock::new(None),
        }
    }

    pub fn ims(&self) -> &ImsClient {
        &self.ims
    }

    /// Record tokens from a successful code exchange.
    pub async fn store_response(&self, response: &TokenResponse) -> Result<(), LightroomError> {
        let tokens = StoredTokens::from_response(response, Utc::now())?;
        self.save(tokens).await
    }

    /// Return a usable access token, refreshing through IMS when the stored
    /// one has expired.
    pub async fn get_access_token(&self) -> Result<String, LightroomError> {
        let tokens = self.load().await?.ok_or(LightroomError::NotConnected)?;

        let now = Utc::now();
        if !tokens.needs_refresh(now) {
            return Ok(tokens.access_token);
        }

        let Some(refresh_token) = tokens.refresh_token.as_deref() else {
            return Ok(tokens.access_token);
        };

        tracing::info!(expires_at = %tokens.expires_at, "Refreshing Adobe access token");
        let response = self.ims.refresh(refresh_token).await?;
        let updated = tokens.refreshed(&response, Utc::now())?;
        let access_token = updated.access_token.clone();
        self.save(updated).await?;

        Ok(access_token)
    }

    async fn load(&self) -> Result<Option<StoredTokens>, LightroomError> {
        if let Some(tokens) = self.cache.read().await.clone() {
            return Ok(Some(tokens));
        }

        let Some(row) = OAuthTokenRepo::find(&self.pool, ADOBE_PROVIDER).await? else {
            return Ok(None);
        };

        let tokens = StoredTokens::from(row);
        *self.cache.write().await = Some(tokens.clone());
        Ok(Some(tokens))
    }

    async fn save(&self, tokens: StoredTokens) -> Result<(), LightroomError> {
        OAuthTokenRepo::upsert(
            &self.pool,
            &UpsertOAuthToken {
                provider: ADOBE_PROVIDER,
                access_token: &tokens.access_token,
                refresh_token: tokens.refresh_token.as_deref(),
                expires_at: tokens.expires_at,
            },
        )
        .await?;

        tracing::debug!(expires_at = %tokens.expires_at, "Stored Adobe tokens");
        *self.cache.write().await = Some(tokens);
        Ok(())
    }
}
