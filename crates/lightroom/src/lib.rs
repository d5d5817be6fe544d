//! Adobe Lightroom integration.
//!
//! Provides the Adobe IMS OAuth client (authorize URL, code exchange,
//! refresh), a token store that keeps the current tokens in memory and in
//! the `oauth_tokens` table, and a read-only Lightroom catalog client.

pub mod catalog;
pub mod config;
pub mod ims;
pub mod tokens;

pub use catalog::{LightroomClient, LightroomPhotos};
pub use config::AdobeConfig;
pub use ims::ImsClient;
pub use tokens::{StoredTokens, TokenStore};

/// HTTP client shared by the IMS and Lightroom clients.
pub use reqwest::Client as HttpClient;

/// Errors from the Adobe integration.
#[derive(Debug, thiserror::Error)]
pub enum LightroomError {
    /// No tokens have been stored; an admin must connect Adobe first.
    #[error("No Lightroom tokens stored; connect Adobe first")]
    NotConnected,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Adobe returned a non-2xx status code.
    #[error("{context} ({status}): {body}")]
    Api {
        context: &'static str,
        status: u16,
        body: String,
    },

    /// Adobe returned a body that could not be interpreted.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Persisting or loading tokens failed.
    #[error("Token storage error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Turn a non-2xx response into [`LightroomError::Api`], keeping the body
/// text for diagnostics.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    context: &'static str,
) -> Result<reqwest::Response, LightroomError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
    Err(LightroomError::Api {
        context,
        status: status.as_u16(),
        body,
    })
}
