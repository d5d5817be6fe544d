//! Repository for the `oauth_tokens` table.

use sqlx::PgPool;

use crate::models::oauth_token::{OAuthToken, UpsertOAuthToken};

const COLUMNS: &str = "provider, access_token, refresh_token, expires_at, updated_at";

/// Persists one token set per OAuth provider.
pub struct OAuthTokenRepo;

impl OAuthTokenRepo {
    pub async fn find(pool: &PgPool, provider: &str) -> Result<Option<OAuthToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM oauth_tokens WHERE provider = $1");
        sqlx::query_as::<_, OAuthToken>(&query)
            .bind(provider)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the token set for a provider.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertOAuthToken<'_>,
    ) -> Result<OAuthToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO oauth_tokens (provider, access_token, refresh_token, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (provider) DO UPDATE SET
                access_token  = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at    = EXCLUDED.expires_at,
                updated_at    = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OAuthToken>(&query)
            .bind(input.provider)
            .bind(input.access_token)
            .bind(input.refresh_token)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }
}
